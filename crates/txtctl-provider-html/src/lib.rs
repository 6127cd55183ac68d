// # HTML Admin Panel TXT Provider
//
// This crate manages ACME challenge TXT records at a hosting provider that has
// no API, only an authenticated HTML administration panel.
//
// ## Flow
//
// ```text
// create: login → resolve zone → add TXT            → check success marker
// delete: login → resolve zone → locate id → delete → check success marker
// ```
//
// Every call logs in fresh and performs exactly one mutating request. There is
// no retry, backoff or session reuse; the ACME orchestrator re-invokes the
// whole operation on failure.
//
// ## Page Matching
//
// Outcomes are read from literal markers and a row regex on the returned HTML
// (see `markers`). HTTP status codes are logged but never decide success,
// because the panel answers 200 for in-page errors as well. The matching lives
// in `zone::find_zone` and `locator::find_record_id` so it can be hardened
// without touching the callers.
//
// ## Security
//
// - The password is sent only in the login form and never logged
// - The Debug implementation of `PanelProvider` holds no secrets

pub mod locator;
pub mod markers;
pub mod session;
pub mod zone;

use async_trait::async_trait;
use txtctl_core::config::PanelConfig;
use txtctl_core::traits::{Credentials, TxtChallenge, TxtOutcome, TxtRecordProvider};
use txtctl_core::{Error, Result};

pub use locator::RecordLocator;
pub use session::{Page, Session, SessionClient};
pub use zone::ZoneResolver;

use markers::{ACTION_ADD_TXT, ACTION_DELETE_TXT, SUCCESS_MARKER, TXT_RECORD_TTL};

/// TXT record provider backed by the HTML administration panel
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the provider logs in, resolves the zone and (for
/// deletes) locates the record exactly as in live mode, then logs the
/// mutating request instead of sending it.
#[derive(Debug, Clone)]
pub struct PanelProvider {
    sessions: SessionClient,
    zones: ZoneResolver,
    locator: RecordLocator,
    dry_run: bool,
}

impl PanelProvider {
    /// Create a provider from panel configuration
    pub fn new(config: &PanelConfig) -> Result<Self> {
        Ok(Self {
            sessions: SessionClient::new(config)?,
            zones: ZoneResolver::new(),
            locator: RecordLocator::new(),
            dry_run: config.dry_run,
        })
    }

    /// Whether mutating requests are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Log in and resolve the challenge's zone
    ///
    /// Any resolution failure is reported as `Error::ZoneNotFound`, carrying
    /// the underlying cause.
    async fn open_zone(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<(Session, String)> {
        let session = self
            .sessions
            .login(credentials, challenge.accept_terms)
            .await?;

        let fqdn = challenge.fqdn();
        let zone = self
            .zones
            .resolve(&session, fqdn)
            .await
            .map_err(|e| {
                if matches!(e, Error::ZoneNotFound { .. }) {
                    e
                } else {
                    Error::zone_not_found(fqdn, e.to_string())
                }
            })?;

        Ok((session, zone))
    }
}

#[async_trait]
impl TxtRecordProvider for PanelProvider {
    async fn create_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome> {
        let (session, zone) = self.open_zone(credentials, challenge).await?;

        tracing::info!(
            "{} TXT record '{}' in zone {} [mode: {}]",
            if self.dry_run { "Would add" } else { "Adding" },
            challenge.record_name,
            zone,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send '{}' for domain={} name={} ttl={}",
                ACTION_ADD_TXT,
                zone,
                challenge.record_name,
                TXT_RECORD_TTL
            );
            return Ok(TxtOutcome::WouldCreate { zone });
        }

        let ttl = TXT_RECORD_TTL.to_string();
        let page = session
            .post_form(
                ACTION_ADD_TXT,
                &[
                    ("domain", zone.as_str()),
                    ("name", challenge.record_name.as_str()),
                    ("value", challenge.value.as_str()),
                    ("ttl", ttl.as_str()),
                ],
            )
            .await?;

        if !page.contains(SUCCESS_MARKER) {
            return Err(Error::record_creation(format!(
                "panel did not confirm TXT record '{}' in zone {} (HTTP {})",
                challenge.record_name,
                zone,
                page.status()
            )));
        }

        tracing::info!("TXT record '{}' added to zone {}", challenge.record_name, zone);
        Ok(TxtOutcome::Created { zone })
    }

    async fn delete_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome> {
        let (session, zone) = self.open_zone(credentials, challenge).await?;

        let record_id = self
            .locator
            .find(&session, &zone, &challenge.record_name, &challenge.value)
            .await?;

        tracing::info!(
            "{} TXT record '{}' (id {}) in zone {} [mode: {}]",
            if self.dry_run { "Would delete" } else { "Deleting" },
            challenge.record_name,
            record_id,
            zone,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send '{}' for domain={} id={}",
                ACTION_DELETE_TXT,
                zone,
                record_id
            );
            return Ok(TxtOutcome::WouldDelete { zone, record_id });
        }

        let page = session
            .get(
                ACTION_DELETE_TXT,
                &[("domain", zone.as_str()), ("id", record_id.as_str())],
            )
            .await?;

        if !page.contains(SUCCESS_MARKER) {
            return Err(Error::record_deletion(format!(
                "panel did not confirm deletion of record {} in zone {} (HTTP {})",
                record_id,
                zone,
                page.status()
            )));
        }

        tracing::info!(
            "TXT record '{}' (id {}) deleted from zone {}",
            challenge.record_name,
            record_id,
            zone
        );
        Ok(TxtOutcome::Deleted { zone, record_id })
    }

    fn provider_name(&self) -> &'static str {
        "html-panel"
    }
}
