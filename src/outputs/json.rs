//! JSON export of the country→leaders mapping.
//!
//! The output is one pretty-printed object keyed by country code, in the
//! order the countries endpoint returned them; each value is the array of
//! that country's leader records with their full field set.

use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::ExportError;

/// Write the country→leaders mapping to `path` as pretty-printed JSON.
///
/// The parent directory must already exist; a missing directory, permission
/// problem, or other write failure maps to the matching [`ExportError`]
/// variant.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_leaders_per_country(
    leaders_per_country: &Map<String, Value>,
    path: &Path,
) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(leaders_per_country)?;
    fs::write(path, json)
        .await
        .map_err(|e| ExportError::from_io(path, e))?;
    info!(countries = leaders_per_country.len(), "Wrote JSON export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_map() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("us".to_string(), json!([{"id": "Q1"}]));
        map.insert("fr".to_string(), json!([]));
        map
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let scratch = tempfile::tempdir().unwrap();
        let path = scratch.path().join("leaders.json");

        write_leaders_per_country(&sample_map(), &path).await.unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: Map<String, Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, sample_map());
    }

    #[tokio::test]
    async fn test_missing_directory_is_distinguished() {
        let scratch = tempfile::tempdir().unwrap();
        let path = scratch.path().join("no_such_dir").join("leaders.json");

        let err = write_leaders_per_country(&sample_map(), &path)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingDirectory { .. }));
    }
}
