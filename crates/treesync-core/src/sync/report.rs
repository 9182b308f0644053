//! Outcome of a run

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every planned operation was attempted; individual ones may have failed
    Completed,
    /// The plan was rejected at the confirmation gate; nothing was changed
    Aborted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Aborted => "Aborted",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report from an executed or aborted run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub status: RunStatus,
    /// Actions taken (or, in a dry run, that would have been taken)
    pub actions: Vec<String>,
    /// Per-file failures; they never change the status
    pub errors: Vec<String>,
    pub dry_run: bool,
    /// Where the run log was written, if it was
    pub log_path: Option<PathBuf>,
}

impl SyncReport {
    pub fn completed(dry_run: bool) -> Self {
        Self {
            status: RunStatus::Completed,
            actions: Vec::new(),
            errors: Vec::new(),
            dry_run,
            log_path: None,
        }
    }

    pub fn aborted() -> Self {
        Self {
            status: RunStatus::Aborted,
            ..Self::completed(false)
        }
    }

    /// Process exit code for this outcome: 1 when aborted, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Completed => 0,
            RunStatus::Aborted => 1,
        }
    }
}
