//! Error types for loading and querying pollution data.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::pollution::TimeAxis;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, PlumeError>;

/// What kind of identifier a failed lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// An injection node with no loaded scenario.
    Scenario,
    /// A network node (table column or graph node).
    Node,
    /// A network directory in the data root.
    Network,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KeyKind::Scenario => "scenario",
            KeyKind::Node => "node",
            KeyKind::Network => "network",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while loading or querying pollution data.
#[derive(Debug, Error)]
pub enum PlumeError {
    /// No scenario tables (or no network files) exist at the location.
    #[error("no data found at {}", .path.display())]
    DataNotFound { path: PathBuf },

    /// An identifier was looked up that was never loaded.
    #[error("{kind} not found: {key}")]
    KeyNotFound { kind: KeyKind, key: String },

    /// A scenario table has the wrong shape or invalid values.
    #[error("invalid table {}: {reason}", .path.display())]
    InvalidTable { path: PathBuf, reason: String },

    /// A scenario's time axis differs from the default scenario's.
    #[error("scenario {scenario} has time axis {found}, expected {expected}")]
    TimeAxisMismatch {
        scenario: String,
        expected: TimeAxis,
        found: TimeAxis,
    },

    /// A scenario's columns differ from the network's node set.
    #[error(
        "scenario {scenario} columns do not match network nodes (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    ColumnMismatch {
        scenario: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// The network description could not be parsed.
    #[error("invalid network {}:{line}: {reason}", .path.display())]
    InvalidNetwork {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Filesystem error other than a missing location.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table file is not valid JSON of the expected layout.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings or metadata could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl PlumeError {
    pub(crate) fn key_not_found(kind: KeyKind, key: impl Into<String>) -> Self {
        PlumeError::KeyNotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlumeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a lookup failure of the given kind.
    pub fn is_key_not_found(&self, expected: KeyKind) -> bool {
        matches!(self, PlumeError::KeyNotFound { kind, .. } if *kind == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_display() {
        let err = PlumeError::key_not_found(KeyKind::Scenario, "X");
        assert_eq!(err.to_string(), "scenario not found: X");
        assert!(err.is_key_not_found(KeyKind::Scenario));
        assert!(!err.is_key_not_found(KeyKind::Node));
    }

    #[test]
    fn test_data_not_found_display() {
        let err = PlumeError::DataNotFound {
            path: PathBuf::from("/data/ky2"),
        };
        assert_eq!(err.to_string(), "no data found at /data/ky2");
    }
}
