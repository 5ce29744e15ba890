//! Error types for the trip planner.
//!
//! Library code returns [`TripError`]; the binary and the MCP glue convert
//! these into `anyhow` errors or public tool errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for trip planner operations.
#[derive(Error, Debug)]
pub enum TripError {
    // === Storage Errors ===
    /// Reading or writing a data file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The planned item table could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A config or registry file could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file changed on disk since it was last loaded.
    #[error(
        "{path} was modified by someone else since it was loaded; reload and try again"
    )]
    StaleRevision {
        /// File whose revision no longer matches.
        path: PathBuf,
    },

    // === Domain Errors ===
    /// An event ends before it starts.
    #[error("event '{title}' ends ({end}) before it starts ({start})")]
    MalformedRange {
        /// Title of the offending item (empty for bare ranges).
        title: String,
        /// Start timestamp.
        start: chrono::NaiveDateTime,
        /// End timestamp.
        end: chrono::NaiveDateTime,
    },

    /// The trip identifier is not in the registry.
    #[error("trip '{0}' does not exist")]
    UnknownTrip(String),

    /// Trip configuration or registry validation failed.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the validation failure.
        message: String,
    },

    // === Sync Errors ===
    /// Git synchronization failed.
    #[error("git sync failed: {0}")]
    Git(String),
}

impl TripError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for trip planner operations.
pub type Result<T> = std::result::Result<T, TripError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stale_revision_message_names_file() {
        let err = TripError::StaleRevision {
            path: PathBuf::from("/data/default.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/default.csv"));
        assert!(msg.contains("reload"));
    }

    #[test]
    fn test_malformed_range_message() {
        let day = NaiveDate::from_ymd_opt(2026, 7, 24).unwrap();
        let err = TripError::MalformedRange {
            title: "Hike".to_string(),
            start: day.and_hms_opt(12, 0, 0).unwrap(),
            end: day.and_hms_opt(10, 0, 0).unwrap(),
        };
        assert!(err.to_string().contains("Hike"));
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = TripError::invalid_config("participants must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration: participants must be at least 1"
        );
    }
}
