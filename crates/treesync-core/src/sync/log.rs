//! Append-only run log, written once as CSV

use std::fmt;

use treesync_fs::{NormalizedPath, csv};

/// First column of every log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Config,
    SafetyWarning,
    ChangedSinceScan,
    ScanError,
    SourceOnly,
    DestOnly,
    Changed,
    Moved,
    Start,
    Copy,
    CopyError,
    Move,
    MoveError,
    Remove,
    RemoveError,
    Archive,
    Preserve,
    ArchiveError,
    Skip,
    SaveError,
    Aborted,
    Completed,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "CONFIG",
            Self::SafetyWarning => "WARNING",
            Self::ChangedSinceScan => "CHANGED SINCE LAST SCAN",
            Self::ScanError => "SCAN ERROR",
            Self::SourceOnly => "SOURCE ONLY",
            Self::DestOnly => "DEST ONLY",
            Self::Changed => "CHANGED",
            Self::Moved => "MOVED",
            Self::Start => "START",
            Self::Copy => "COPY",
            Self::CopyError => "COPY ERROR",
            Self::Move => "MOVE",
            Self::MoveError => "MOVE ERROR",
            Self::Remove => "REMOVE",
            Self::RemoveError => "REMOVE ERROR",
            Self::Archive => "ARCHIVE",
            Self::Preserve => "PRESERVE",
            Self::ArchiveError => "ARCHIVE ERROR",
            Self::Skip => "SKIP",
            Self::SaveError => "SAVE ERROR",
            Self::Aborted => "ABORTED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub tag: LogTag,
    pub args: Vec<String>,
}

impl LogEntry {
    pub fn row(&self) -> Vec<&str> {
        std::iter::once(self.tag.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<I, S>(&mut self, tag: LogTag, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push(LogEntry {
            tag,
            args: args.into_iter().map(Into::into).collect(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows carrying `tag`.
    pub fn count(&self, tag: LogTag) -> usize {
        self.entries.iter().filter(|e| e.tag == tag).count()
    }

    pub fn rows(&self) -> Vec<Vec<&str>> {
        self.entries.iter().map(LogEntry::row).collect()
    }

    /// The whole log encoded as CSV text.
    pub fn to_csv(&self) -> String {
        self.rows().iter().map(|row| csv::encode_row(row)).collect()
    }

    /// Write every row to `path`, replacing any previous content.
    pub fn flush(&self, path: &NormalizedPath) -> treesync_fs::Result<()> {
        csv::write_rows(path, &self.rows())?;
        tracing::debug!(path = %path, rows = self.entries.len(), "Run log written");
        Ok(())
    }
}
