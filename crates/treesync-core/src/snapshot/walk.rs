//! Incremental directory walk

use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use treesync_fs::NormalizedPath;
use walkdir::WalkDir;

use super::{ChangeKind, FileRecord, ScanIssue, Snapshot, SnapshotChange};
use crate::config::CrcMode;

/// Options for a single walk.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub crc_mode: CrcMode,
    /// Folder names pruned wherever they appear
    pub ignored: Vec<String>,
}

impl ScanOptions {
    pub fn new(crc_mode: CrcMode, ignored: Vec<String>) -> Self {
        Self { crc_mode, ignored }
    }
}

/// Modification time of `metadata` in fractional seconds.
pub(crate) fn mtime_seconds(metadata: &fs::Metadata) -> f64 {
    let time = FileTime::from_last_modification_time(metadata);
    time.unix_seconds() as f64 + f64::from(time.nanoseconds()) / 1e9
}

/// Build a snapshot of `root`.
///
/// Files whose size and modification time equal the record in `prior` reuse
/// that record as-is, cached checksum included. Every other file gets a fresh
/// record and, when a prior snapshot was given, a "changed since last scan"
/// entry in [`Snapshot::changes`]; prior paths no longer present are reported
/// as removed. Entries that cannot be read are collected in
/// [`Snapshot::scan_errors`] and the walk continues.
///
/// A missing root yields an empty snapshot.
pub fn walk(root: &Path, options: &ScanOptions, prior: Option<&Snapshot>) -> Snapshot {
    let mut snapshot = Snapshot::new(root, options.crc_mode, options.ignored.clone());
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "Root does not exist, empty snapshot");
        return snapshot;
    }

    let ignored = &options.ignored;
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && ignored
                    .iter()
                    .any(|name| entry.file_name().to_string_lossy() == name.as_str()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| lossy_relative(root, p))
                    .unwrap_or_default();
                tracing::warn!(root = %root.display(), path = %path, error = %e, "Skipping unreadable entry");
                snapshot.push_scan_error(ScanIssue {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let rel = match relative(root, entry.path()) {
            Ok(rel) => rel,
            Err(name) => {
                tracing::warn!(path = %entry.path().display(), "Skipping entry with a non UTF-8 name");
                snapshot.push_scan_error(ScanIssue {
                    path: lossy_relative(root, entry.path()),
                    message: format!("name {:?} is not valid UTF-8", name),
                });
                continue;
            }
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            match fs::read_dir(entry.path()) {
                Ok(mut children) => {
                    if children.next().is_none() {
                        snapshot.insert(rel, FileRecord::dir_placeholder());
                    }
                }
                Err(e) => snapshot.push_scan_error(ScanIssue {
                    path: rel,
                    message: e.to_string(),
                }),
            }
            continue;
        }

        // Symlinks are followed for their content, like a plain copy would
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Could not stat file");
                snapshot.push_scan_error(ScanIssue {
                    path: rel,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !metadata.is_file() {
            tracing::debug!(path = %entry.path().display(), "Skipping non-regular entry");
            continue;
        }

        let fresh = FileRecord::file(metadata.len(), mtime_seconds(&metadata));
        let record = match prior.and_then(|p| p.get(&rel)) {
            Some(previous) if previous.same_stat(&fresh) => previous.clone(),
            Some(previous) => {
                snapshot.push_change(SnapshotChange {
                    path: rel.clone(),
                    kind: ChangeKind::Modified,
                    previous: Some(previous.clone()),
                });
                fresh
            }
            None => {
                if prior.is_some() {
                    snapshot.push_change(SnapshotChange {
                        path: rel.clone(),
                        kind: ChangeKind::Added,
                        previous: None,
                    });
                }
                fresh
            }
        };
        snapshot.insert(rel, record);
    }

    // Placeholders are compared like files against the prior snapshot
    if let Some(prior) = prior {
        let placeholders: Vec<String> = snapshot
            .records()
            .iter()
            .filter(|(path, record)| record.is_dir && !prior.contains(path))
            .map(|(path, _)| path.clone())
            .collect();
        for path in placeholders {
            snapshot.push_change(SnapshotChange {
                path,
                kind: ChangeKind::Added,
                previous: None,
            });
        }

        let removed: Vec<SnapshotChange> = prior
            .records()
            .iter()
            .filter(|(path, _)| !snapshot.contains(path) && !snapshot.is_ignored(path))
            .map(|(path, record)| SnapshotChange {
                path: path.clone(),
                kind: ChangeKind::Removed,
                previous: Some(record.clone()),
            })
            .collect();
        for change in removed {
            snapshot.push_change(change);
        }
    }

    if options.crc_mode == CrcMode::All {
        let paths: Vec<String> = snapshot.paths().cloned().collect();
        for path in paths {
            snapshot.ensure_checksum(&path);
        }
    }

    tracing::debug!(
        root = %root.display(),
        entries = snapshot.len(),
        changes = snapshot.changes().len(),
        errors = snapshot.scan_errors().len(),
        "Scan complete"
    );
    snapshot
}

/// Snapshot key of `path`: its components below `root` joined with `/`.
fn relative(root: &Path, path: &Path) -> Result<String, OsString> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    NormalizedPath::from_components(rel).map(|p| p.as_str().to_string())
}

fn lossy_relative(root: &Path, path: &Path) -> String {
    NormalizedPath::new(path.strip_prefix(root).unwrap_or(path))
        .as_str()
        .to_string()
}
