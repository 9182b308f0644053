//! Well-known names inside a synchronized root.

use std::path::Path;

/// Default name of the folder holding snapshots, logs and archives.
pub const DEFAULT_METADATA_DIR: &str = ".treesync";

/// Files stored inside a root's metadata directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFile {
    /// Persisted snapshot of the root (`dirinfo.json`)
    Snapshot,
    /// Saved run configuration (`config.json`)
    Config,
}

impl MetadataFile {
    /// Get the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "dirinfo.json",
            Self::Config => "config.json",
        }
    }

    /// File name of the run log for a given run timestamp.
    pub fn log_name(timestamp: &str) -> String {
        format!("log-{}.csv", timestamp)
    }
}

impl AsRef<Path> for MetadataFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for MetadataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
