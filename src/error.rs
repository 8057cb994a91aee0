//! Error types for the fetch and export pipelines.
//!
//! Two families of failures exist: [`ScrapeError`] for everything that can go
//! wrong while talking to the leaders API or Wikipedia, and [`ExportError`]
//! for everything that can go wrong while writing the output files. Auth
//! rejections get their own variant because the session client recovers from
//! them locally (cookie refresh + retry) instead of reporting them.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while fetching data from the leaders API or Wikipedia.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection failure, timeout, or any other transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API rejected the session cookie with 401 or 403.
    #[error("authentication rejected with HTTP {status}")]
    AuthExpired { status: u16 },

    /// The response body was not the JSON shape we asked for.
    #[error("malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A status code the protocol does not account for.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The cookie endpoint answered without a `Set-Cookie` header.
    #[error("cookie endpoint response carried no Set-Cookie header")]
    MissingCookie,

    /// The configured API root could not be parsed as a URL.
    #[error("invalid API root URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ScrapeError {
    /// True for 401/403 rejections, the only failures worth a cookie refresh.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ScrapeError::AuthExpired { .. })
    }
}

/// Failures while writing the JSON or CSV export files.
///
/// The file-level variants carry the output path so a single log line tells
/// the operator which file failed and why.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A leader could not be serialized.
    #[error("failed to serialize leader data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// CSV assembly failed.
    #[error("failed to write CSV data: {0}")]
    Csv(#[from] csv::Error),

    /// Exporting an empty leader list has no header row to derive.
    #[error("no leaders to export; fetch data before exporting")]
    NoLeaders,

    /// The directory the output file should land in does not exist.
    #[error("output directory for {} does not exist: {source}", .path.display())]
    MissingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output path exists but is not writable by this process.
    #[error("permission denied writing {}: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while writing an output file.
    #[error("I/O error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Classify an I/O error against the output path it occurred on.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ExportError::MissingDirectory {
                path: path.to_path_buf(),
                source,
            },
            std::io::ErrorKind::PermissionDenied => ExportError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => ExportError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Classify a `csv::Error`, unwrapping I/O errors so the path-aware
    /// variants apply to them too.
    pub fn from_csv(path: &Path, source: csv::Error) -> Self {
        if !source.is_io_error() {
            return ExportError::Csv(source);
        }
        match source.into_kind() {
            csv::ErrorKind::Io(io) => ExportError::from_io(path, io),
            // unreachable: is_io_error() held above
            _ => ExportError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("unclassified csv I/O error"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_classification() {
        let path = Path::new("/tmp/out/leaders.json");

        let missing = ExportError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, ExportError::MissingDirectory { .. }));

        let denied = ExportError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, ExportError::PermissionDenied { .. }));

        let other = ExportError::from_io(path, io::Error::from(io::ErrorKind::WriteZero));
        assert!(matches!(other, ExportError::Io { .. }));
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let path = Path::new("/tmp/out/leaders.csv");
        let err = ExportError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().contains("/tmp/out/leaders.csv"));
    }

    #[test]
    fn test_auth_expired_predicate() {
        assert!(ScrapeError::AuthExpired { status: 401 }.is_auth_expired());
        assert!(!ScrapeError::MissingCookie.is_auth_expired());
    }
}
