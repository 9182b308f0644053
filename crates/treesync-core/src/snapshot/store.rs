//! Persistence of snapshots inside their own root

use std::collections::BTreeMap;
use std::path::Path;
use treesync_fs::{ConfigStore, MetadataFile, NormalizedPath};

use super::{FileRecord, Snapshot};
use crate::Result;
use crate::config::CrcMode;

/// Reads and writes `<root>/<metadata_dir>/dirinfo.json`.
///
/// The file is a JSON object keyed by relative path. Only records are
/// stored; the scan diagnostics of a snapshot are not.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: NormalizedPath,
}

impl SnapshotStore {
    pub fn new(root: &Path, metadata_dir: &str) -> Self {
        let path = NormalizedPath::new(root)
            .join(metadata_dir)
            .join(MetadataFile::Snapshot.as_str());
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted snapshot, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self, root: &Path, crc_mode: CrcMode, ignored: Vec<String>) -> Result<Option<Snapshot>> {
        let records: Option<BTreeMap<String, FileRecord>> =
            ConfigStore::new().load_optional(&self.path)?;
        Ok(records.map(|records| {
            let mut snapshot = Snapshot::new(root, crc_mode, ignored);
            for (path, record) in records {
                snapshot.insert(path, record);
            }
            snapshot
        }))
    }

    /// Persist the records of `snapshot` atomically.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        ConfigStore::new().save(&self.path, snapshot.records())?;
        tracing::debug!(path = %self.path, entries = snapshot.len(), "Snapshot saved");
        Ok(())
    }
}
