//! Client library for the PlanPay subscription service.
//!
//! Provides bearer-token session management with durable persistence
//! (`auth::SessionManager`), a REST client for the plan catalog and
//! payment flow (`api::ApiClient`), and OS-keychain credential storage
//! for interactive use (`auth::CredentialStore`).

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;
