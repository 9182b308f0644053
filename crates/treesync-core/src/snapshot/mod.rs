//! Directory snapshots
//!
//! A [`Snapshot`] is the manifest of one root at one point in time: relative
//! path → [`FileRecord`]. Snapshots are built by [`walk`], which reuses the
//! records of a prior snapshot for files whose size and modification time are
//! unchanged, and persisted with [`SnapshotStore`].

mod record;
mod store;
mod walk;

pub use record::FileRecord;
pub use store::SnapshotStore;
pub use walk::{ScanOptions, walk};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use treesync_fs::NormalizedPath;
use treesync_fs::checksum::compute_file_checksum;

use crate::config::CrcMode;

/// How a path differs from the prior snapshot of the same root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// A "changed since last scan" diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotChange {
    pub path: String,
    pub kind: ChangeKind,
    /// The record the prior snapshot held, if any
    pub previous: Option<FileRecord>,
}

/// A path the walk could not stat or hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanIssue {
    pub path: String,
    pub message: String,
}

/// Aggregate figures for a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub file_count: usize,
    pub dir_count: usize,
    pub total_size: u64,
    /// Sum of all file checksums modulo 2^32
    pub checksum_sum: u32,
}

/// Manifest of one directory tree.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    crc_mode: CrcMode,
    ignored: Vec<String>,
    records: BTreeMap<String, FileRecord>,
    changes: Vec<SnapshotChange>,
    scan_errors: Vec<ScanIssue>,
}

impl Snapshot {
    /// Create an empty snapshot of `root`.
    pub fn new(root: impl Into<PathBuf>, crc_mode: CrcMode, ignored: Vec<String>) -> Self {
        Self {
            root: root.into(),
            crc_mode,
            ignored,
            records: BTreeMap::new(),
            changes: Vec::new(),
            scan_errors: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn crc_mode(&self) -> CrcMode {
        self.crc_mode
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Whether any component of `path` names an ignored folder.
    pub fn is_ignored(&self, path: &str) -> bool {
        path.split('/').any(|c| self.ignored.iter().any(|i| i == c))
    }

    /// Add a record. Paths under an ignored folder are refused.
    ///
    /// Returns `false` if the path was refused.
    pub fn insert(&mut self, path: impl Into<String>, record: FileRecord) -> bool {
        let path = NormalizedPath::new(path.into()).as_str().to_string();
        if path.is_empty() || self.is_ignored(&path) {
            return false;
        }
        self.records.insert(path, record);
        true
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    /// Drop the record for `path` so the next incremental walk re-reads it.
    pub fn remove(&mut self, path: &str) -> Option<FileRecord> {
        self.records.remove(path)
    }

    /// Relative paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.records.keys()
    }

    pub fn records(&self) -> &BTreeMap<String, FileRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Differences against the prior snapshot found while walking.
    pub fn changes(&self) -> &[SnapshotChange] {
        &self.changes
    }

    pub fn scan_errors(&self) -> &[ScanIssue] {
        &self.scan_errors
    }

    /// Absolute path of a relative entry.
    pub fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(NormalizedPath::new(path).to_native())
    }

    /// Checksum of `path`, computed and cached on first request.
    ///
    /// Directory placeholders hash to 0 without touching the disk. Returns
    /// `None` when the path is unknown or its content cannot be read; an
    /// unreadable file is retried on the next request.
    pub fn ensure_checksum(&mut self, path: &str) -> Option<u32> {
        let full_path = self.full_path(path);
        let record = self.records.get_mut(path)?;
        if let Some(checksum) = record.checksum {
            return Some(checksum);
        }
        if record.is_dir {
            record.checksum = Some(0);
            return Some(0);
        }
        match compute_file_checksum(&full_path) {
            Ok(checksum) => {
                record.checksum = Some(checksum);
                Some(checksum)
            }
            Err(e) => {
                tracing::warn!(path = %full_path.display(), error = %e, "Could not checksum file");
                self.scan_errors.push(ScanIssue {
                    path: path.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    /// Every directory of the tree: the parents of all entries plus the
    /// empty-directory placeholders.
    pub fn directories(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::new();
        for (path, record) in &self.records {
            if record.is_dir {
                dirs.insert(path.clone());
            }
            let mut parent = NormalizedPath::new(path).parent();
            while let Some(dir) = parent {
                parent = dir.parent();
                dirs.insert(dir.as_str().to_string());
            }
        }
        dirs
    }

    /// File count, directory count, total size and summed checksum.
    ///
    /// Checksums missing from the snapshot are computed, so this reads every
    /// file that has not been hashed yet.
    pub fn stats(&mut self) -> TreeStats {
        let files: Vec<String> = self
            .records
            .iter()
            .filter(|(_, record)| !record.is_dir)
            .map(|(path, _)| path.clone())
            .collect();
        let mut stats = TreeStats {
            dir_count: self.directories().len(),
            ..TreeStats::default()
        };

        for path in &files {
            let Some(record) = self.records.get(path) else {
                continue;
            };
            stats.file_count += 1;
            stats.total_size += record.size;
            if let Some(checksum) = self.ensure_checksum(path) {
                stats.checksum_sum = stats.checksum_sum.wrapping_add(checksum);
            }
        }

        stats
    }

    pub(crate) fn push_change(&mut self, change: SnapshotChange) {
        self.changes.push(change);
    }

    pub(crate) fn push_scan_error(&mut self, issue: ScanIssue) {
        self.scan_errors.push(issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ignored() -> Vec<String> {
        vec![".treesync".to_string()]
    }

    #[test]
    fn test_insert_refuses_ignored_paths() {
        let mut snapshot = Snapshot::new("/root", CrcMode::None, ignored());
        assert!(snapshot.insert("a.txt", FileRecord::file(1, 1.0)));
        assert!(!snapshot.insert(".treesync/dirinfo.json", FileRecord::file(1, 1.0)));
        assert!(!snapshot.insert("sub/.treesync/x", FileRecord::file(1, 1.0)));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_insert_normalizes_separators() {
        let mut snapshot = Snapshot::new("/root", CrcMode::None, Vec::new());
        snapshot.insert("sub\\a.txt", FileRecord::file(1, 1.0));
        assert!(snapshot.contains("sub/a.txt"));
    }

    #[test]
    fn test_ensure_checksum_is_memoized() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        let mut snapshot = Snapshot::new(temp.path(), CrcMode::Match, Vec::new());
        snapshot.insert("a.txt", FileRecord::file(5, 1.0));

        let first = snapshot.ensure_checksum("a.txt").unwrap();
        assert_eq!(snapshot.get("a.txt").unwrap().checksum, Some(first));

        // Content changes behind our back are not seen once cached
        fs::write(temp.path().join("a.txt"), "world").unwrap();
        assert_eq!(snapshot.ensure_checksum("a.txt"), Some(first));
    }

    #[test]
    fn test_ensure_checksum_unreadable_file() {
        let temp = TempDir::new().unwrap();
        let mut snapshot = Snapshot::new(temp.path(), CrcMode::Match, Vec::new());
        snapshot.insert("ghost.txt", FileRecord::file(5, 1.0));

        assert_eq!(snapshot.ensure_checksum("ghost.txt"), None);
        assert_eq!(snapshot.scan_errors().len(), 1);
        assert_eq!(snapshot.get("ghost.txt").unwrap().checksum, None);
    }

    #[test]
    fn test_ensure_checksum_dir_placeholder_is_zero() {
        let mut snapshot = Snapshot::new("/does/not/exist", CrcMode::All, Vec::new());
        snapshot.insert("empty", FileRecord::dir_placeholder());
        assert_eq!(snapshot.ensure_checksum("empty"), Some(0));
    }

    #[test]
    fn test_directories_include_ancestors_and_placeholders() {
        let mut snapshot = Snapshot::new("/root", CrcMode::None, Vec::new());
        snapshot.insert("a.txt", FileRecord::file(1, 1.0));
        snapshot.insert("x/y/b.txt", FileRecord::file(1, 1.0));
        snapshot.insert("e", FileRecord::dir_placeholder());

        let dirs: Vec<String> = snapshot.directories().into_iter().collect();
        assert_eq!(dirs, vec!["e", "x", "x/y"]);
    }

    #[test]
    fn test_stats_counts_nested_dirs() {
        let mut snapshot = Snapshot::new("/root", CrcMode::All, Vec::new());
        snapshot.insert("a.txt", FileRecord::file(5, 1.0).with_checksum(10));
        snapshot.insert("x/y/b.txt", FileRecord::file(7, 1.0).with_checksum(u32::MAX));
        snapshot.insert("x/empty", FileRecord::dir_placeholder());

        let stats = snapshot.stats();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.dir_count, 3);
        assert_eq!(stats.total_size, 12);
        assert_eq!(stats.checksum_sum, 9);
    }
}
