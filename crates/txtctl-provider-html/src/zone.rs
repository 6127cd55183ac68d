//! Hosted zone discovery
//!
//! The panel has no zone lookup; the account's zone overview page is fetched
//! and every proper suffix of the name is searched for verbatim in it.

use tracing::{debug, info};
use txtctl_core::{Error, Result};

use crate::markers::ACTION_ZONE_LIST;
use crate::session::Session;

/// Proper suffixes of `fqdn`, most specific first
///
/// Excludes the full name and the bare TLD: `a.b.example.com` yields
/// `b.example.com` then `example.com`. A trailing root dot is ignored.
pub fn candidate_suffixes(fqdn: &str) -> Vec<String> {
    let labels: Vec<&str> = fqdn.trim_end_matches('.').split('.').collect();
    if labels.len() < 3 {
        return Vec::new();
    }

    (1..labels.len() - 1)
        .map(|start| labels[start..].join("."))
        .collect()
}

/// Pick the hosted zone for `fqdn` out of a zone overview page
///
/// Every candidate present in the listing overwrites the previous pick, so
/// when several suffixes match the least specific one is returned.
pub fn find_zone(listing: &str, fqdn: &str) -> Option<String> {
    let mut zone = None;
    for candidate in candidate_suffixes(fqdn) {
        if listing.contains(&candidate) {
            debug!("Zone listing contains candidate '{}'", candidate);
            zone = Some(candidate);
        }
    }
    zone
}

/// Resolves the hosted zone a name belongs to
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneResolver;

impl ZoneResolver {
    /// Create a new resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve the zone suffix for `fqdn`
    ///
    /// # Errors
    ///
    /// - `Error::ZoneNotFound`: no candidate suffix appears in the overview
    /// - `Error::Transport`: the overview could not be fetched
    pub async fn resolve(&self, session: &Session, fqdn: &str) -> Result<String> {
        let page = session.get(ACTION_ZONE_LIST, &[]).await?;

        match find_zone(page.body(), fqdn) {
            Some(zone) => {
                info!("Resolved {} to zone {}", fqdn, zone);
                Ok(zone)
            }
            None => Err(Error::zone_not_found(
                fqdn,
                format!(
                    "none of [{}] is listed in the account's zone overview (HTTP {})",
                    candidate_suffixes(fqdn).join(", "),
                    page.status()
                ),
            )),
        }
    }
}
