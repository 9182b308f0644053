//! Normalized path handling for cross-platform compatibility

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Relative paths inside a snapshot are stored in this form so persisted
/// manifests and filter patterns behave the same on every platform.
/// Empty and `.` components are dropped and `..` is resolved lexically,
/// except where it climbs above the start of a relative path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// The input is split into components by the platform's own rules, so a
    /// backslash is a separator on Windows and part of a file name elsewhere.
    /// Names that are not valid UTF-8 are converted lossily; use
    /// [`NormalizedPath::from_components`] where that must be refused.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut prefix = String::new();
        let mut absolute = false;
        let mut parts: Vec<String> = Vec::new();
        for component in path.as_ref().components() {
            match component {
                Component::Prefix(p) => {
                    prefix = p.as_os_str().to_string_lossy().replace('\\', "/");
                }
                Component::RootDir => absolute = true,
                Component::CurDir => {}
                Component::ParentDir => push_parent(&mut parts, absolute),
                Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            }
        }
        Self {
            inner: assemble(&prefix, absolute, &parts),
        }
    }

    /// Build a relative path from its components, refusing names that are
    /// not valid UTF-8.
    ///
    /// Returns the offending component on failure.
    pub fn from_components(path: &Path) -> Result<Self, OsString> {
        let mut parts: Vec<String> = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => match name.to_str() {
                    Some(name) => parts.push(name.to_string()),
                    None => return Err(name.to_os_string()),
                },
                Component::ParentDir => push_parent(&mut parts, false),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Ok(Self {
            inner: parts.join("/"),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let segment = segment.as_ref();
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Apply a `..` component. Leading `..` of a relative path are kept; above
/// the root of an absolute path they are dropped.
fn push_parent(parts: &mut Vec<String>, absolute: bool) {
    match parts.last() {
        Some(last) if last != ".." => {
            parts.pop();
        }
        _ if !absolute => parts.push("..".to_string()),
        _ => {}
    }
}

fn assemble(prefix: &str, absolute: bool, parts: &[String]) -> String {
    let joined = parts.join("/");
    if absolute {
        format!("{}/{}", prefix, joined)
    } else {
        format!("{}{}", prefix, joined)
    }
}

/// Validate that `name` can be used as a single directory component.
///
/// Used for the metadata and archive folder names, which must stay directly
/// under a root and must never escape it.
pub fn validate_dir_name(name: &str, label: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} must not be empty", label));
    }
    if name == "." || name == ".." {
        return Err(format!("{} must not be '{}'", label, name));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!(
            "{} must be a single path component, got '{}'",
            label, name
        ));
    }
    if name.contains('\0') {
        return Err(format!("{} must not contain NUL bytes", label));
    }
    Ok(())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
