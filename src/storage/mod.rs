//! Durable token persistence.
//!
//! The session manager treats storage as an injectable key-value
//! collaborator holding a single token entry. `FileTokenStore` persists
//! to a JSON file under a storage directory and survives restarts;
//! `MemoryTokenStore` keeps the token in memory for tests and ephemeral
//! sessions.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use anyhow::Result;

/// Key-value persistence boundary for the session token
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if one exists
    fn load(&self) -> Result<Option<String>>;

    /// Persist the token, replacing any previous value
    fn store(&self, token: &str) -> Result<()>;

    /// Remove the persisted token entry.
    /// Removing an absent entry is not an error.
    fn clear(&self) -> Result<()>;
}
