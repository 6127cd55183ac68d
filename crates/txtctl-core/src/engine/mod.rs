//! Challenge engine
//!
//! The ChallengeEngine is responsible for:
//! - Validating the requested challenge
//! - Loading credentials from the CredentialStore
//! - Handing both to the TxtRecordProvider for exactly one operation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   Credentials   ┌─────────────────┐
//! │ CredentialStore │────────────────▶│ ChallengeEngine │
//! └─────────────────┘                 └─────────────────┘
//!                                              │
//!                                              ▼
//!                                   ┌───────────────────┐
//!                                   │ TxtRecordProvider │
//!                                   │ login → zone →    │
//!                                   │ (locate) → mutate │
//!                                   └───────────────────┘
//! ```
//!
//! There is no retry here. Every error is returned to the caller unchanged.

use crate::error::Result;
use crate::traits::{CredentialStore, TxtChallenge, TxtOutcome, TxtRecordProvider};
use tracing::{error, info, warn};

/// Which provider operation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Present,
    Cleanup,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Present => "present",
            Operation::Cleanup => "cleanup",
        }
    }
}

/// Drives a single ACME challenge record operation
pub struct ChallengeEngine {
    /// Source of the panel login
    credential_store: Box<dyn CredentialStore>,

    /// Provider that performs the record operation
    provider: Box<dyn TxtRecordProvider>,
}

impl ChallengeEngine {
    /// Create a new engine
    pub fn new(
        credential_store: Box<dyn CredentialStore>,
        provider: Box<dyn TxtRecordProvider>,
    ) -> Self {
        Self {
            credential_store,
            provider,
        }
    }

    /// Publish the challenge TXT record
    pub async fn present(&self, challenge: &TxtChallenge) -> Result<TxtOutcome> {
        self.run(Operation::Present, challenge).await
    }

    /// Remove the challenge TXT record
    pub async fn cleanup(&self, challenge: &TxtChallenge) -> Result<TxtOutcome> {
        self.run(Operation::Cleanup, challenge).await
    }

    async fn run(&self, operation: Operation, challenge: &TxtChallenge) -> Result<TxtOutcome> {
        challenge.validate()?;

        info!(
            "Starting {} of TXT record '{}' for {} via {} [credentials: {}]",
            operation.as_str(),
            challenge.record_name,
            challenge.fqdn(),
            self.provider.provider_name(),
            self.credential_store.store_name()
        );

        let credentials = self.credential_store.load().await?;

        let result = match operation {
            Operation::Present => self.provider.create_txt(&credentials, challenge).await,
            Operation::Cleanup => self.provider.delete_txt(&credentials, challenge).await,
        };
        drop(credentials);

        match &result {
            Ok(outcome) if outcome.is_dry_run() => {
                warn!(
                    "[DRY-RUN] {} of '{}' in zone {} was not sent",
                    operation.as_str(),
                    challenge.record_name,
                    outcome.zone()
                );
            }
            Ok(outcome) => {
                info!(
                    "Completed {} of '{}' in zone {}",
                    operation.as_str(),
                    challenge.record_name,
                    outcome.zone()
                );
            }
            Err(e) => {
                error!(
                    "{} of '{}' for {} failed: {}",
                    operation.as_str(),
                    challenge.record_name,
                    challenge.fqdn(),
                    e
                );
            }
        }

        result
    }
}
