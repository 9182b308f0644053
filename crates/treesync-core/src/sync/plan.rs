use std::fmt;
use std::path::{Path, PathBuf};

use crate::diff::DiffResult;
use crate::snapshot::Snapshot;

use super::RunLog;

/// The destination no longer matches the snapshot persisted by the last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyWarning {
    pub root: PathBuf,
    /// Entries added, modified or removed since the last scan
    pub changes: usize,
}

impl fmt::Display for SafetyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed outside treesync since the last run ({} entries)",
            self.root.display(),
            self.changes
        )
    }
}

/// Everything decided before the confirmation gate.
#[derive(Debug)]
pub struct SyncPlan {
    pub(crate) source: Snapshot,
    pub(crate) dest: Snapshot,
    pub(crate) diff: DiffResult,
    pub(crate) warnings: Vec<SafetyWarning>,
    pub(crate) log: RunLog,
}

impl SyncPlan {
    pub fn source(&self) -> &Snapshot {
        &self.source
    }

    pub fn dest(&self) -> &Snapshot {
        &self.dest
    }

    pub fn source_root(&self) -> &Path {
        self.source.root()
    }

    pub fn dest_root(&self) -> &Path {
        self.dest.root()
    }

    pub fn diff(&self) -> &DiffResult {
        &self.diff
    }

    pub fn warnings(&self) -> &[SafetyWarning] {
        &self.warnings
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// True when the trees already agree.
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }
}
