//! CRC32 checksum utilities
//!
//! File contents are hashed incrementally so large files never need to be
//! held in memory. CRC32 is used for speed: it catches accidental
//! same-size/same-mtime collisions, it is not an integrity guarantee against
//! deliberate tampering.

use crc32fast::Hasher;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// Compute the CRC32 of an in-memory buffer.
pub fn compute_bytes_checksum(content: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hasher.finalize()
}

/// Compute the CRC32 of a file's contents, streaming in fixed-size chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> io::Result<u32> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize())
}

/// Render a checksum the way it is shown to users (eight upper-case hex digits).
pub fn format_checksum(checksum: u32) -> String {
    format!("{:08X}", checksum)
}
