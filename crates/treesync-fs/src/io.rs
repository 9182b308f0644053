//! Snapshot, config and log persistence primitives

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Replace `path` with `content` without ever exposing a partial file.
///
/// The bytes go to a sibling `.<name>.<pid>.partial` file, written and synced
/// under an exclusive advisory lock, which is then renamed over `path`. The
/// partial file is removed again when any step fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let partial = partial_path(&target);
    let written = write_locked(&partial, content)
        .and_then(|()| fs::rename(&partial, &target).map_err(|e| Error::io(&target, e)));
    if written.is_err() {
        fs::remove_file(&partial).ok();
    }
    written
}

/// Same directory as `target`, so the final rename stays on one filesystem.
fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.partial", name, std::process::id()))
}

/// The lock is released when the file is closed.
fn write_locked(partial: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(partial)
        .map_err(|e| Error::io(partial, e))?;
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: partial.to_path_buf(),
    })?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(partial, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file, returning `None` if it does not exist.
pub fn read_text_optional(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
