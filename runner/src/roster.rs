//! Roster file: a JSON array of name records.

use crate::error::Result;
use namedraw_engine::NameRecord;
use std::fs;
use std::path::Path;

/// Read the roster at `path`.
pub fn load(path: &Path) -> Result<Vec<NameRecord>> {
    let raw = fs::read_to_string(path)?;
    let records: Vec<NameRecord> = serde_json::from_str(&raw)?;
    tracing::info!(path = %path.display(), count = records.len(), "roster loaded");
    Ok(records)
}

/// Write `records` back to `path`, replacing it in one rename.
pub fn save(path: &Path, records: &[NameRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), count = records.len(), "roster saved");
    Ok(())
}
