//! REST API client module for the PlanPay service.
//!
//! This module provides the `ApiClient` for authentication, the
//! subscription plan catalog, and the payment flow.
//!
//! Authenticated endpoints use a bearer token obtained from the login
//! endpoint and attached to each request from the client's shared
//! bearer slot.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
