//! Record id discovery
//!
//! Record ids only appear in the zone's DNS setup page, inside the delete
//! link of each table row. The row is found by its name and value cells and
//! the id is read from the rest of that row only.

use regex::Regex;
use tracing::{debug, info};
use txtctl_core::{Error, Result};

use crate::markers::ACTION_RECORD_LIST;
use crate::session::Session;

/// Build the pattern for the name and value cells of one row
fn row_pattern(record_name: &str, value: &str) -> Result<Regex> {
    let pattern = format!(
        r"(?s)<td>{}</td>\s*<td>{}</td>",
        regex::escape(record_name),
        regex::escape(value)
    );

    Regex::new(&pattern)
        .map_err(|e| Error::invalid_input(format!("cannot build record pattern: {}", e)))
}

/// Start of the next table row, or end of the current one
fn row_boundary() -> Result<Regex> {
    Regex::new(r"(?i)</?tr[\s>]")
        .map_err(|e| Error::invalid_input(format!("cannot build row boundary: {}", e)))
}

/// An `id` parameter up to the next parameter-terminating character
///
/// The word boundary keeps longer parameter names such as `recid=` out.
fn id_parameter() -> Result<Regex> {
    Regex::new(r#"\bid=[^&"'<>\s]+"#)
        .map_err(|e| Error::invalid_input(format!("cannot build id pattern: {}", e)))
}

/// Extract the id of the first row matching name and value
///
/// The id is searched only between the value cell and the end of that row.
/// When several rows share name and value the first one carrying an id is
/// returned.
pub fn find_record_id(listing: &str, record_name: &str, value: &str) -> Result<Option<String>> {
    let cells = row_pattern(record_name, value)?;
    let boundary = row_boundary()?;
    let id_param = id_parameter()?;

    for cell_match in cells.find_iter(listing) {
        let rest = &listing[cell_match.end()..];
        let row = match boundary.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        };

        let id = id_param.find(row).and_then(|m| {
            m.as_str()
                .rsplit('=')
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        });

        if id.is_some() {
            return Ok(id);
        }
    }

    Ok(None)
}

/// Locates provider-assigned record ids
///
/// Ids are valid only for the listing they were read from; nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordLocator;

impl RecordLocator {
    /// Create a new locator
    pub fn new() -> Self {
        Self
    }

    /// Find the id of the TXT record `record_name` = `value` in `zone`
    ///
    /// # Errors
    ///
    /// - `Error::RecordNotFound`: no row matches name and value
    /// - `Error::Transport`: the listing could not be fetched
    pub async fn find(
        &self,
        session: &Session,
        zone: &str,
        record_name: &str,
        value: &str,
    ) -> Result<String> {
        let page = session.get(ACTION_RECORD_LIST, &[("domain", zone)]).await?;
        debug!("Scanning record listing of {} for '{}'", zone, record_name);

        match find_record_id(page.body(), record_name, value)? {
            Some(id) => {
                info!("Located record '{}' in {} with id {}", record_name, zone, id);
                Ok(id)
            }
            None => Err(Error::record_not_found(format!(
                "no TXT record '{}' with the given value in zone {} (HTTP {})",
                record_name,
                zone,
                page.status()
            ))),
        }
    }
}
