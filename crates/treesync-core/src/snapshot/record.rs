//! Per-path metadata record

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Metadata for one path in a [`super::Snapshot`].
///
/// The relative path is the key under which the record is stored. Empty
/// directories are kept as zero-size placeholders with `is_dir` set so they
/// can be created or removed like files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub size: u64,
    /// Modification time in seconds since the Unix epoch
    pub mtime: f64,
    /// CRC32 of the content, present only once computed
    #[serde(rename = "crc", default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<u32>,
    #[serde(rename = "dir", default, skip_serializing_if = "is_false")]
    pub is_dir: bool,
}

impl FileRecord {
    /// Record for a regular file, checksum not yet known.
    pub fn file(size: u64, mtime: f64) -> Self {
        Self {
            size,
            mtime,
            checksum: None,
            is_dir: false,
        }
    }

    /// Placeholder for an empty directory.
    pub fn dir_placeholder() -> Self {
        Self {
            size: 0,
            mtime: 0.0,
            checksum: None,
            is_dir: true,
        }
    }

    /// Same record with a known checksum.
    pub fn with_checksum(mut self, checksum: u32) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Whether size and modification time are identical to `other`.
    ///
    /// This is the reuse test of the incremental scan, not the diff's
    /// tolerant comparison.
    pub fn same_stat(&self, other: &FileRecord) -> bool {
        self.is_dir == other.is_dir && self.size == other.size && self.mtime == other.mtime
    }
}
