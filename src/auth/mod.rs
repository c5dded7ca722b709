//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `SessionManager`: bearer-token session state with durable persistence
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! The session token is restored from a `TokenStore` at construction;
//! `initialize` re-arms the outbound bearer header after a restart.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{AuthError, SessionManager};
