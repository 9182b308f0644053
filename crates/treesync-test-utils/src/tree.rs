//! [`TestTree`] builder for synchronization scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;

/// Folder name skipped by [`TestTree::files`].
const METADATA_DIR: &str = ".treesync";

/// A temporary directory tree with helpers for setup and assertions.
///
/// # Example
///
/// ```rust,no_run
/// use treesync_test_utils::TestTree;
///
/// let source = TestTree::new();
/// source.file("a.txt", "hello", 100).mkdir("empty");
/// source.assert_file_contains("a.txt", "hello");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
        self
    }

    /// Write `content` to `rel` and set its modification time to `mtime` (unix seconds).
    pub fn file(&self, rel: &str, content: &str, mtime: i64) -> &Self {
        self.write(rel, content).set_mtime(rel, mtime)
    }

    /// Create the directory `rel` and its parents.
    pub fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).unwrap();
        self
    }

    pub fn set_mtime(&self, rel: &str, mtime: i64) -> &Self {
        filetime::set_file_mtime(self.path(rel), FileTime::from_unix_time(mtime, 0))
            .unwrap_or_else(|e| panic!("Could not set mtime of {}: {}", rel, e));
        self
    }

    /// Modification time of `rel` in whole unix seconds.
    pub fn mtime(&self, rel: &str) -> i64 {
        let metadata = fs::metadata(self.path(rel)).unwrap();
        FileTime::from_last_modification_time(&metadata).unix_seconds()
    }

    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Relative paths of every file, sorted, skipping the metadata folder.
    pub fn files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(self.root(), self.root(), &mut files);
        files.sort();
        files
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            rel,
            content,
            file_content
        );
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == METADATA_DIR) {
                continue;
            }
            collect_files(root, &path, out);
        } else {
            let rel: Vec<String> = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(rel.join("/"));
        }
    }
}
