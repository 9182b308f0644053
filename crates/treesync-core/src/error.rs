//! Error types for treesync-core

use std::path::PathBuf;

/// Result type for treesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in treesync-core operations
///
/// Configuration errors are fatal and raised before any scan. Scan and
/// per-file operation failures are recovered where they happen and only
/// surface through the run log and [`crate::SyncReport::errors`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Contradictory or malformed run configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A source or destination root that cannot be used
    #[error("Invalid root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// A filter pattern that is not a valid regular expression
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Unrecognized value for an enumerated option
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A single copy/move/remove/archive that failed
    #[error("{op} failed for {path}: {source}")]
    Operation {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error from treesync-fs
    #[error(transparent)]
    Fs(#[from] treesync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn operation(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Operation {
            op,
            path: path.into(),
            source,
        }
    }
}
