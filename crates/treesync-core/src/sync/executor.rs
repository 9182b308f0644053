//! Mode-specific file operations
//!
//! Every operation is attempted independently. A failure is logged with an
//! error tag and collected in the report; the remaining operations still run.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use treesync_fs::NormalizedPath;

use crate::archive::Archiver;
use crate::config::{ConflictPolicy, RunConfig, SyncMode};
use crate::diff::{DiffResult, MovedPair};
use crate::snapshot::Snapshot;

use super::{LogTag, RunLog, SyncReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Source,
    Dest,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Self::Source => Self::Dest,
            Self::Dest => Self::Source,
        }
    }
}

/// Relative paths written by the executor, per root.
///
/// A written file can keep the size and time of the entry it replaced, so
/// these paths must not be reused from the pre-run snapshot.
#[derive(Debug, Default)]
pub(crate) struct Touched {
    pub(crate) source: BTreeSet<String>,
    pub(crate) dest: BTreeSet<String>,
}

impl Touched {
    fn mark(&mut self, side: Side, rel: &str) {
        match side {
            Side::Source => self.source.insert(rel.to_string()),
            Side::Dest => self.dest.insert(rel.to_string()),
        };
    }
}

pub(crate) struct Executor<'a> {
    config: &'a RunConfig,
    archiver: &'a Archiver,
    source_root: &'a Path,
    dest_root: &'a Path,
    log: &'a mut RunLog,
    report: &'a mut SyncReport,
    touched: Touched,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        config: &'a RunConfig,
        archiver: &'a Archiver,
        log: &'a mut RunLog,
        report: &'a mut SyncReport,
    ) -> Self {
        Self {
            config,
            archiver,
            source_root: &config.source,
            dest_root: &config.dest,
            log,
            report,
            touched: Touched::default(),
        }
    }

    fn root(&self, side: Side) -> &'a Path {
        match side {
            Side::Source => self.source_root,
            Side::Dest => self.dest_root,
        }
    }

    /// Apply `diff` in order: additions, one-sided removals and moves, conflicts.
    pub(crate) fn apply(mut self, source: &Snapshot, dest: &Snapshot, diff: &DiffResult) -> Touched {
        for path in &diff.source_only {
            self.copy(Side::Dest, path);
        }
        match self.config.mode {
            SyncMode::Sync => {
                for path in &diff.dest_only {
                    self.copy(Side::Source, path);
                }
            }
            SyncMode::Mirror => {
                for path in &diff.dest_only {
                    self.discard(dest, path);
                }
            }
            SyncMode::Backup => {}
        }
        for pair in &diff.moved {
            self.relocate(pair);
        }
        for path in &diff.changed {
            self.resolve(source, dest, path);
        }
        self.touched
    }

    /// Copy `rel` onto the `to` side from the other one.
    fn copy(&mut self, to: Side, rel: &str) {
        let from = native(self.root(to.other()), rel);
        let target = native(self.root(to), rel);
        let args = [display(&from), display(&target)];
        if self.config.dry_run {
            self.record(LogTag::Copy, args);
            return;
        }
        match copy_entry(&from, &target) {
            Ok(()) => {
                self.touched.mark(to, rel);
                self.record(LogTag::Copy, args);
            }
            Err(e) => self.fail(LogTag::CopyError, args, e),
        }
    }

    /// Remove a destination-only entry, through the archive when enabled.
    ///
    /// An empty-directory placeholder the source still needs as a parent is
    /// left alone; the copies have filled it by now.
    fn discard(&mut self, dest: &Snapshot, rel: &str) {
        if self.archiver.keeps(rel) && dest.get(rel).is_some_and(|r| r.is_dir) {
            tracing::debug!(path = %rel, "Keeping directory needed by the source");
            return;
        }
        let root = self.dest_root;
        let target = native(root, rel);
        if self.archiver.is_enabled() {
            let args = [display(&target), display(&self.archiver.archive_path(root, rel))];
            if self.config.dry_run {
                self.record(LogTag::Archive, args);
                return;
            }
            match self.archiver.archive(root, rel) {
                Ok(_) => self.record(LogTag::Archive, args),
                Err(e) => self.fail(LogTag::ArchiveError, args, e),
            }
        } else {
            let args = [display(&target)];
            if self.config.dry_run {
                self.record(LogTag::Remove, args);
                return;
            }
            match self.archiver.remove(root, rel) {
                Ok(()) => self.record(LogTag::Remove, args),
                Err(e) => self.fail(LogTag::RemoveError, args, e),
            }
        }
    }

    /// Rename a moved file inside the destination to its source-side path.
    ///
    /// The old location is copied into the archive first; if that fails the
    /// rename is skipped.
    fn relocate(&mut self, pair: &MovedPair) {
        let root = self.dest_root;
        let from = native(root, &pair.dest);
        let to = native(root, &pair.source);
        let move_args = [display(&from), display(&to)];
        let preserve_args = [display(&from), display(&self.archiver.archive_path(root, &pair.dest))];

        if self.config.dry_run {
            if self.archiver.is_enabled() {
                self.record(LogTag::Preserve, preserve_args);
            }
            self.record(LogTag::Move, move_args);
            return;
        }

        match self.archiver.preserve(root, &pair.dest) {
            Ok(Some(_)) => self.record(LogTag::Preserve, preserve_args),
            Ok(None) => {}
            Err(e) => {
                self.fail(LogTag::ArchiveError, preserve_args, e);
                return;
            }
        }
        match move_entry(&from, &to) {
            Ok(()) => {
                self.touched.mark(Side::Dest, &pair.source);
                self.record(LogTag::Move, move_args);
                if let Err(e) = self.archiver.prune(root, &pair.dest) {
                    tracing::warn!(path = %from.display(), error = %e, "Could not prune vacated directories");
                }
            }
            Err(e) => self.fail(LogTag::MoveError, move_args, e),
        }
    }

    fn resolve(&mut self, source: &Snapshot, dest: &Snapshot, rel: &str) {
        let winner = match self.config.conflict {
            ConflictPolicy::Source => Side::Source,
            ConflictPolicy::Dest => Side::Dest,
            ConflictPolicy::Newer => match (source.get(rel), dest.get(rel)) {
                (Some(s), Some(d)) if s.mtime > d.mtime => Side::Source,
                _ => Side::Dest,
            },
            ConflictPolicy::Skip => {
                self.record(LogTag::Skip, [rel.to_string()]);
                return;
            }
        };
        self.overwrite(winner.other(), rel);
    }

    /// Copy the winning side of a conflict over the losing side `to`.
    ///
    /// The losing entry is archived first when archiving is enabled; a
    /// failed archive leaves it untouched.
    fn overwrite(&mut self, to: Side, rel: &str) {
        let to_root = self.root(to);
        let from = native(self.root(to.other()), rel);
        let target = native(to_root, rel);
        let copy_args = [display(&from), display(&target)];
        let archive_args = [display(&target), display(&self.archiver.archive_path(to_root, rel))];

        if self.config.dry_run {
            if self.archiver.is_enabled() {
                self.record(LogTag::Archive, archive_args);
            }
            self.record(LogTag::Copy, copy_args);
            return;
        }

        if self.archiver.is_enabled() {
            match self.archiver.archive(to_root, rel) {
                Ok(_) => self.record(LogTag::Archive, archive_args),
                Err(e) => {
                    self.fail(LogTag::ArchiveError, archive_args, e);
                    return;
                }
            }
        } else if let Err(e) = clear_mismatched_kind(&from, &target) {
            self.fail(LogTag::RemoveError, [display(&target)], e);
            return;
        }

        match copy_entry(&from, &target) {
            Ok(()) => {
                self.touched.mark(to, rel);
                self.record(LogTag::Copy, copy_args);
            }
            Err(e) => self.fail(LogTag::CopyError, copy_args, e),
        }
    }

    fn record<const N: usize>(&mut self, tag: LogTag, args: [String; N]) {
        let action = describe(tag, &args);
        tracing::debug!(action = %action, dry_run = self.config.dry_run, "Applied");
        self.report.actions.push(if self.config.dry_run {
            format!("[dry-run] {}", action)
        } else {
            action
        });
        self.log.push(tag, args);
    }

    fn fail<const N: usize>(&mut self, tag: LogTag, args: [String; N], error: io::Error) {
        let message = format!("{}: {}", describe(tag, &args), error);
        tracing::error!(error = %error, "{}", describe(tag, &args));
        self.report.errors.push(message);
        self.log
            .push(tag, args.into_iter().chain(std::iter::once(error.to_string())));
    }
}

fn native(root: &Path, rel: &str) -> PathBuf {
    root.join(NormalizedPath::new(rel).to_native())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn describe(tag: LogTag, args: &[String]) -> String {
    format!("{} {}", tag.as_str().to_lowercase(), args.join(" -> "))
}

/// Copy a file (keeping its modification time) or recreate an empty directory.
fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    if metadata.is_dir() {
        return fs::create_dir_all(to);
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)?;
    filetime::set_file_mtime(to, FileTime::from_last_modification_time(&metadata))
}

fn move_entry(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}

/// Remove `to` when it is a directory and `from` a file, or the reverse.
fn clear_mismatched_kind(from: &Path, to: &Path) -> io::Result<()> {
    let Ok(target) = fs::symlink_metadata(to) else {
        return Ok(());
    };
    if target.is_dir() == from.is_dir() {
        return Ok(());
    }
    if target.is_dir() {
        fs::remove_dir_all(to)
    } else {
        fs::remove_file(to)
    }
}
