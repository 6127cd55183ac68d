//! Error types for txtctl
//!
//! Every variant is fatal to the invocation. The orchestrator that calls the
//! CLI owns any retry loop.

use thiserror::Error;

/// Result type alias for txtctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for txtctl
#[derive(Error, Debug)]
pub enum Error {
    /// No usable credentials in the store
    #[error("Credentials not set: {0}")]
    CredentialsNotSet(String),

    /// The panel rejected the username/password
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The account has pending terms and approval was declined
    #[error("Terms of service not accepted: {0}")]
    TermsNotAccepted(String),

    /// No hosted zone is a suffix of the requested name
    #[error("Zone not found for {fqdn}: {reason}")]
    ZoneNotFound {
        /// The name that was being resolved
        fqdn: String,
        /// Why resolution failed
        reason: String,
    },

    /// No row in the record listing matches name and value
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// The add request did not come back with the success marker
    #[error("Record creation failed: {0}")]
    RecordCreation(String),

    /// The delete request did not come back with the success marker
    #[error("Record deletion failed: {0}")]
    RecordDeletion(String),

    /// The panel could not be reached or the response could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credential store I/O or permission errors
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a "credentials not set" error
    pub fn credentials_not_set(msg: impl Into<String>) -> Self {
        Self::CredentialsNotSet(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a terms-not-accepted error
    pub fn terms_not_accepted(msg: impl Into<String>) -> Self {
        Self::TermsNotAccepted(msg.into())
    }

    /// Create a zone-not-found error
    pub fn zone_not_found(fqdn: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ZoneNotFound {
            fqdn: fqdn.into(),
            reason: reason.into(),
        }
    }

    /// Create a record-not-found error
    pub fn record_not_found(msg: impl Into<String>) -> Self {
        Self::RecordNotFound(msg.into())
    }

    /// Create a record-creation error
    pub fn record_creation(msg: impl Into<String>) -> Self {
        Self::RecordCreation(msg.into())
    }

    /// Create a record-deletion error
    pub fn record_deletion(msg: impl Into<String>) -> Self {
        Self::RecordDeletion(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a credential store error
    pub fn credential_store(msg: impl Into<String>) -> Self {
        Self::CredentialStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
