use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::UserProfile;
use crate::storage::TokenStore;

/// Which operation an `AuthError` came from. Selects the generic message
/// used when the server gave no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOp {
    Login,
    Register,
}

impl AuthOp {
    fn fallback_message(self) -> &'static str {
        match self {
            AuthOp::Login => "Login failed",
            AuthOp::Register => "Registration failed",
        }
    }
}

/// A failed login or registration.
///
/// Display renders the server's `detail` field when one was present,
/// else the operation's generic message.
#[derive(Debug, Error)]
#[error("{}", self.message())]
pub struct AuthError {
    op: AuthOp,
    #[source]
    source: ApiError,
}

impl AuthError {
    fn new(op: AuthOp, source: ApiError) -> Self {
        Self { op, source }
    }

    /// User-facing message: the server detail if present, the generic
    /// per-operation fallback otherwise
    pub fn message(&self) -> &str {
        self.source
            .detail()
            .unwrap_or_else(|| self.op.fallback_message())
    }

    /// HTTP status of the rejection, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.source.status()
    }
}

struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// Bearer-token session manager.
///
/// Owns the session state, the API client whose outbound bearer header
/// it keeps in sync, and the durable token store. All session mutation
/// happens here; concurrent login/logout calls race last-writer-wins.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a manager, restoring any persisted token into memory.
    /// The bearer header is not armed until `initialize` or a login.
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Result<Self> {
        let token = store
            .load()
            .context("Failed to load persisted session")?
            .filter(|t| !t.is_empty());
        debug!(restored = token.is_some(), "Session manager created");

        Ok(Self {
            api,
            store,
            state: RwLock::new(SessionState { token, user: None }),
        })
    }

    /// Log in with email and password.
    ///
    /// On success the token is stored in memory, persisted, and armed on
    /// the API client together. A failed login leaves all three untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let token = self
            .api
            .login(email, password)
            .await
            .map_err(|e| AuthError::new(AuthOp::Login, e))?;

        if let Err(e) = self.store.store(&token) {
            // The in-memory session is still usable for this run
            warn!(error = %e, "Failed to persist session token");
        }
        self.state.write().expect("session lock poisoned").token = Some(token.clone());
        self.api.set_bearer(&token);
        debug!("Login succeeded");
        Ok(())
    }

    /// Create an account. Does not log in or touch session state.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        self.api
            .register(name, email, password)
            .await
            .map_err(|e| AuthError::new(AuthOp::Register, e))
    }

    /// Clear the session: memory and bearer header first, then the
    /// persisted entry. Memory and header are cleared even if removing
    /// the persisted entry fails.
    pub fn logout(&self) -> Result<()> {
        {
            let mut state = self.state.write().expect("session lock poisoned");
            state.token = None;
            state.user = None;
        }
        self.api.clear_bearer();
        self.store
            .clear()
            .context("Failed to remove persisted session")?;
        debug!("Logged out");
        Ok(())
    }

    /// Arm the API client's bearer header from the current token, if any.
    /// Idempotent; a no-op when unauthenticated.
    pub fn initialize(&self) {
        if let Some(token) = self.token() {
            self.api.set_bearer(&token);
        }
    }

    /// True when a session token is held
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session lock poisoned")
            .token
            .is_some()
    }

    /// The current session token, if any
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session lock poisoned")
            .token
            .clone()
    }

    /// The user profile. Login and registration never populate this.
    pub fn user(&self) -> Option<UserProfile> {
        self.state
            .read()
            .expect("session lock poisoned")
            .user
            .clone()
    }

    /// The API client sharing this session's bearer header
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
