//! CSV export of the leader list.
//!
//! The header row comes from the serde field order of [`Leader`], so the
//! columns always match the JSON export's object layout. One data row per
//! leader; a row that fails to serialize is logged and skipped rather than
//! failing the whole file.

use std::path::Path;
use tracing::{error, info, instrument};

use crate::error::ExportError;
use crate::models::Leader;

/// Write one CSV row per leader to `path`, header row included.
///
/// Callers guard against an empty list before calling; this function assumes
/// at least one row is coming so the header derivation is well-defined.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_leader_rows(leaders: &[Leader], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::from_csv(path, e))?;

    let mut written = 0usize;
    for leader in leaders {
        match writer.serialize(leader) {
            Ok(()) => written += 1,
            Err(e) => {
                error!(leader_id = %leader.id, error = %e, "Skipping row that failed to serialize");
            }
        }
    }

    writer.flush().map_err(|e| ExportError::from_io(path, e))?;
    info!(rows = written, total = leaders.len(), "Wrote CSV export");
    Ok(())
}
