// # Credential Store Trait
//
// Defines the interface for persisting the username/password pair used to log
// into the administration panel.
//
// ## Implementations
//
// - File-based: `FileCredentialStore` (owner-only JSON file)
// - In-memory: `MemoryCredentialStore`
//
// ## Usage
//
// ```rust,ignore
// use txtctl_core::{CredentialStore, Credentials};
//
// let store = /* CredentialStore implementation */;
// store.save(&Credentials::new("alice", "hunter2")).await?;
// let credentials = store.load().await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Username/password pair for the administration panel
///
/// The Debug implementation never prints the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Panel login name
    pub username: String,
    /// Panel password
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty to be usable for login
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Trait for credential store implementations
///
/// # Contract
///
/// - `load()` returns `Error::CredentialsNotSet` when nothing usable is stored
/// - Persistent implementations must keep the stored secret readable only by
///   the principal that saved it
/// - Stores are read once per invocation; they never cache across processes
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored credentials
    ///
    /// # Returns
    ///
    /// - `Ok(Credentials)`: A complete username/password pair
    /// - `Err(Error::CredentialsNotSet)`: Nothing stored, or incomplete
    /// - `Err(Error)`: Storage error
    async fn load(&self) -> Result<Credentials, crate::Error>;

    /// Replace the stored credentials
    async fn save(&self, credentials: &Credentials) -> Result<(), crate::Error>;

    /// Remove the stored credentials (succeeds if nothing was stored)
    async fn clear(&self) -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
