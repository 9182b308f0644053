//! Snapshot comparison
//!
//! [`DiffEngine::compare`] partitions the union of two snapshots into
//! source-only, destination-only, changed and (implicitly) matching paths,
//! then optionally pairs one-sided files into renames.

mod matcher;

pub use matcher::{mtimes_compatible, records_match};

use serde::{Deserialize, Serialize};

use crate::config::PathFilter;
use crate::snapshot::Snapshot;

/// A destination-only file recognized as a relocated source-only file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedPair {
    /// Path the content has on the source side
    pub source: String,
    /// Path the same content currently has on the destination side
    pub dest: String,
}

/// Outcome of comparing two snapshots. All lists are in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub source_only: Vec<String>,
    pub dest_only: Vec<String>,
    pub changed: Vec<String>,
    pub moved: Vec<MovedPair>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.source_only.is_empty()
            && self.dest_only.is_empty()
            && self.changed.is_empty()
            && self.moved.is_empty()
    }

    /// Number of entries needing attention.
    pub fn len(&self) -> usize {
        self.source_only.len() + self.dest_only.len() + self.changed.len() + self.moved.len()
    }
}

/// Compares a source snapshot with a destination snapshot.
#[derive(Debug, Clone, Copy)]
pub struct DiffEngine<'a> {
    detect_moves: bool,
    filter: &'a PathFilter,
}

impl<'a> DiffEngine<'a> {
    pub fn new(detect_moves: bool, filter: &'a PathFilter) -> Self {
        Self {
            detect_moves,
            filter,
        }
    }

    /// Diff `source` against `dest`.
    ///
    /// Neither the filesystem nor any recorded size, time or kind is
    /// modified; in `Match` mode the snapshots' checksum caches may be filled.
    ///
    /// Move pairing is greedy: source-only files are visited in path order
    /// and each takes the first destination-only file (in path order) that
    /// matches it. Directory placeholders are never paired.
    pub fn compare(&self, source: &mut Snapshot, dest: &mut Snapshot) -> DiffResult {
        let crc_mode = source.crc_mode().effective(dest.crc_mode());
        let mut result = DiffResult::default();

        let source_paths: Vec<String> = source
            .paths()
            .filter(|p| self.filter.allows(p))
            .cloned()
            .collect();
        let dest_paths: Vec<String> = dest
            .paths()
            .filter(|p| self.filter.allows(p))
            .cloned()
            .collect();

        for path in &source_paths {
            if dest.contains(path) {
                if !records_match(source, path, dest, path, crc_mode) {
                    result.changed.push(path.clone());
                }
            } else {
                result.source_only.push(path.clone());
            }
        }
        for path in dest_paths {
            if !source.contains(&path) {
                result.dest_only.push(path);
            }
        }

        if self.detect_moves {
            let mut unpaired = Vec::with_capacity(result.source_only.len());
            for src in std::mem::take(&mut result.source_only) {
                if source.get(&src).is_some_and(|r| r.is_dir) {
                    unpaired.push(src);
                    continue;
                }
                let mut hit = None;
                for (index, candidate) in result.dest_only.iter().enumerate() {
                    if dest.get(candidate).is_some_and(|r| r.is_dir) {
                        continue;
                    }
                    if records_match(source, &src, dest, candidate, crc_mode) {
                        hit = Some(index);
                        break;
                    }
                }
                match hit {
                    Some(index) => {
                        let dst = result.dest_only.remove(index);
                        result.moved.push(MovedPair { source: src, dest: dst });
                    }
                    None => unpaired.push(src),
                }
            }
            result.source_only = unpaired;
        }

        tracing::debug!(
            crc_mode = %crc_mode,
            source_only = result.source_only.len(),
            dest_only = result.dest_only.len(),
            changed = result.changed.len(),
            moved = result.moved.len(),
            "Diff complete"
        );
        result
    }
}
