// # TXT Record Provider Trait
//
// Defines the interface for publishing and removing ACME challenge TXT
// records at a DNS hosting provider.
//
// ## Implementations
//
// - HTML admin panel: `txtctl-provider-html` crate

use async_trait::async_trait;

use crate::traits::credential_store::Credentials;

/// Maximum length of a fully-qualified domain name
const MAX_FQDN_LEN: usize = 253;

/// One challenge record operation, as requested by the ACME orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxtChallenge {
    /// Name the certificate is issued for; also used to resolve the zone
    pub identifier: String,
    /// Record name as the panel lists it (e.g. `_acme-challenge.www`)
    pub record_name: String,
    /// TXT record value (the challenge token digest)
    pub value: String,
    /// Whether pending terms of service may be approved during login
    pub accept_terms: bool,
}

impl TxtChallenge {
    /// Create a new challenge that accepts pending terms
    pub fn new(
        identifier: impl Into<String>,
        record_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            record_name: record_name.into(),
            value: value.into(),
            accept_terms: true,
        }
    }

    /// Set whether pending terms may be approved
    pub fn with_accept_terms(mut self, accept_terms: bool) -> Self {
        self.accept_terms = accept_terms;
        self
    }

    /// The identifier with any trailing root dot removed
    pub fn fqdn(&self) -> &str {
        self.identifier.trim_end_matches('.')
    }

    /// Validate the challenge before any network traffic
    pub fn validate(&self) -> Result<(), crate::Error> {
        let fqdn = self.fqdn();
        if fqdn.is_empty() {
            return Err(crate::Error::invalid_input("identifier cannot be empty"));
        }
        if fqdn.len() > MAX_FQDN_LEN {
            return Err(crate::Error::invalid_input(format!(
                "identifier too long: {} chars (max {})",
                fqdn.len(),
                MAX_FQDN_LEN
            )));
        }
        if self.record_name.trim().is_empty() {
            return Err(crate::Error::invalid_input("record name cannot be empty"));
        }
        if self.value.is_empty() {
            return Err(crate::Error::invalid_input("TXT value cannot be empty"));
        }
        Ok(())
    }
}

/// Result of a TXT record operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxtOutcome {
    /// Record was added to the zone
    Created {
        /// The resolved zone
        zone: String,
    },
    /// Record was removed from the zone
    Deleted {
        /// The resolved zone
        zone: String,
        /// Provider-assigned id of the removed record
        record_id: String,
    },
    /// Dry-run: the add request was skipped
    WouldCreate {
        /// The resolved zone
        zone: String,
    },
    /// Dry-run: the delete request was skipped
    WouldDelete {
        /// The resolved zone
        zone: String,
        /// Provider-assigned id of the located record
        record_id: String,
    },
}

impl TxtOutcome {
    /// The zone the operation targeted
    pub fn zone(&self) -> &str {
        match self {
            TxtOutcome::Created { zone }
            | TxtOutcome::Deleted { zone, .. }
            | TxtOutcome::WouldCreate { zone }
            | TxtOutcome::WouldDelete { zone, .. } => zone,
        }
    }

    /// Whether the mutating request was skipped
    pub fn is_dry_run(&self) -> bool {
        matches!(
            self,
            TxtOutcome::WouldCreate { .. } | TxtOutcome::WouldDelete { .. }
        )
    }
}

/// Trait for TXT record provider implementations
///
/// Each call is single-shot: log in fresh, resolve, mutate once, report.
/// Implementations must not retry, back off or cache sessions between calls;
/// the orchestrator re-invokes the whole operation on failure.
#[async_trait]
pub trait TxtRecordProvider: Send + Sync {
    /// Publish the challenge TXT record
    ///
    /// Re-running with an identical name/value may create a duplicate record.
    async fn create_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome, crate::Error>;

    /// Remove the challenge TXT record
    ///
    /// Fails with `Error::RecordNotFound` when the record is already gone.
    async fn delete_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn_strips_root_dot() {
        let challenge = TxtChallenge::new("www.example.com.", "_acme-challenge.www", "tok");
        assert_eq!(challenge.fqdn(), "www.example.com");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        assert!(TxtChallenge::new("", "_acme-challenge", "tok").validate().is_err());
        assert!(TxtChallenge::new("example.com", " ", "tok").validate().is_err());
        assert!(TxtChallenge::new("example.com", "_acme-challenge", "").validate().is_err());
        assert!(TxtChallenge::new("example.com", "_acme-challenge", "tok").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_identifier() {
        let long = format!("{}.com", "a".repeat(251));
        let err = TxtChallenge::new(long, "_acme-challenge", "tok")
            .validate()
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = TxtOutcome::WouldDelete {
            zone: "example.com".to_string(),
            record_id: "42".to_string(),
        };
        assert_eq!(outcome.zone(), "example.com");
        assert!(outcome.is_dry_run());
        assert!(!TxtOutcome::Created { zone: "example.com".to_string() }.is_dry_run());
    }

    #[test]
    fn test_accept_terms_default_and_override() {
        let challenge = TxtChallenge::new("example.com", "_acme-challenge", "tok");
        assert!(challenge.accept_terms);
        assert!(!challenge.with_accept_terms(false).accept_terms);
    }
}
