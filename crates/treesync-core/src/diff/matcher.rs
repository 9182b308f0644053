//! The record comparison used by every diff decision

use crate::config::CrcMode;
use crate::snapshot::Snapshot;

/// Largest whole-second difference treated as filesystem rounding
const ROUNDING_TOLERANCE_SECS: i64 = 1;

/// Exact offset produced by a daylight-saving shift on FAT-style filesystems
const DST_SHIFT_SECS: i64 = 3600;

/// Whether two modification times are close enough to count as equal.
///
/// Times are compared in whole seconds (truncated), tolerating a difference
/// of at most one second or exactly one hour.
pub fn mtimes_compatible(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let delta = (a.trunc() as i64 - b.trunc() as i64).abs();
    delta <= ROUNDING_TOLERANCE_SECS || delta == DST_SHIFT_SECS
}

/// Decide whether `left[left_path]` and `right[right_path]` hold the same content.
///
/// - `All`: checksums must be equal, size and time are ignored.
/// - `None` / `Match`: sizes must be equal and times compatible (see
///   [`mtimes_compatible`]); `Match` additionally requires equal checksums,
///   computed on demand and cached in the snapshots.
///
/// A file never matches a directory placeholder, and a missing or
/// unreadable checksum never matches anything. The relation is symmetric.
pub fn records_match(
    left: &mut Snapshot,
    left_path: &str,
    right: &mut Snapshot,
    right_path: &str,
    crc_mode: CrcMode,
) -> bool {
    let (Some(l), Some(r)) = (left.get(left_path), right.get(right_path)) else {
        return false;
    };
    if l.is_dir != r.is_dir {
        return false;
    }
    let (l_size, l_mtime, r_size, r_mtime) = (l.size, l.mtime, r.size, r.mtime);

    match crc_mode {
        CrcMode::All => checksums_equal(left, left_path, right, right_path),
        CrcMode::None | CrcMode::Match => {
            if l_size != r_size || !mtimes_compatible(l_mtime, r_mtime) {
                return false;
            }
            crc_mode == CrcMode::None || checksums_equal(left, left_path, right, right_path)
        }
    }
}

fn checksums_equal(left: &mut Snapshot, left_path: &str, right: &mut Snapshot, right_path: &str) -> bool {
    let l = left.ensure_checksum(left_path);
    let r = right.ensure_checksum(right_path);
    matches!((l, r), (Some(a), Some(b)) if a == b)
}
