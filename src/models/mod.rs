//! Data models for PlanPay entities.
//!
//! This module contains the data structures used to represent service
//! data including:
//!
//! - `UserProfile`: account info as returned by registration
//! - `Plan`: subscription plan catalog entries
//! - `UserSubscription`: the user's subscriptions and their lifecycle state
//! - Payment types: `PaymentCheckout`, `PaymentOutcome`, `PaymentStatus`

pub mod payment;
pub mod subscription;
pub mod user;

pub use payment::{PaymentCheckout, PaymentOutcome, PaymentStatus};
pub use subscription::{Plan, UserSubscription};
pub use user::UserProfile;
