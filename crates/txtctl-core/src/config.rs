//! Configuration types for txtctl
//!
//! This module defines the configuration structures shared by the CLI and the
//! provider crate.

use serde::{Deserialize, Serialize};

/// Largest accepted HTTP timeout, in seconds
const MAX_TIMEOUT_SECS: u64 = 600;

/// Main txtctl configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxtctlConfig {
    /// Administration panel settings
    pub panel: PanelConfig,

    /// Where the panel login is stored
    #[serde(default)]
    pub credential_store: CredentialStoreConfig,
}

impl TxtctlConfig {
    /// Create a configuration for the given panel endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            panel: PanelConfig::new(base_url),
            credential_store: CredentialStoreConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.panel.validate()?;
        self.credential_store.validate()?;
        Ok(())
    }
}

/// Administration panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Panel endpoint; every action is a query-string action against it
    pub base_url: String,

    /// Optional HTTP timeout in seconds (None = client default, no timeout)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Optional User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Perform login and lookups but skip the mutating request
    #[serde(default)]
    pub dry_run: bool,
}

impl PanelConfig {
    /// Create a live-mode panel configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: None,
            user_agent: None,
            dry_run: false,
        }
    }

    /// Set the HTTP timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the panel configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.trim().is_empty() {
            return Err(crate::Error::config("panel URL cannot be empty"));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            crate::Error::config(format!("panel URL '{}' is invalid: {}", self.base_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(crate::Error::config(format!(
                    "panel URL must use http or https, got '{}'",
                    other
                )));
            }
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            return Err(crate::Error::config(format!(
                "timeout must be between 1 and {} seconds, got {}",
                MAX_TIMEOUT_SECS, timeout
            )));
        }

        Ok(())
    }

    /// The configured timeout as a Duration
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }
}

/// Credential store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialStoreConfig {
    /// Owner-only JSON file
    File {
        /// Path to the credential file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,
}

impl CredentialStoreConfig {
    /// Validate the credential store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            CredentialStoreConfig::File { path } => {
                if path.trim().is_empty() {
                    return Err(crate::Error::config("credential file path cannot be empty"));
                }
                Ok(())
            }
            CredentialStoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            CredentialStoreConfig::File { .. } => "file",
            CredentialStoreConfig::Memory => "memory",
        }
    }
}
