//! Enumerated policy options
//!
//! Each option serializes in lowercase and parses from the same spelling,
//! so CLI arguments and saved configs agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// How files that exist on only one side are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Source-only files are copied, destination-only files are archived or deleted
    #[default]
    Mirror,
    /// Source-only files are copied, destination-only files are kept
    Backup,
    /// One-sided files are copied in both directions
    Sync,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Backup => "backup",
            Self::Sync => "sync",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mirror" => Ok(Self::Mirror),
            "backup" => Ok(Self::Backup),
            "sync" => Ok(Self::Sync),
            _ => Err(Error::UnknownVariant {
                kind: "mode",
                value: s.to_string(),
                expected: "mirror, backup, sync",
            }),
        }
    }
}

/// How a path present on both sides with differing content is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Source overwrites destination
    #[default]
    Source,
    /// Destination overwrites source
    Dest,
    /// The side with the later modification time wins
    Newer,
    /// Conflicts are reported and left alone
    #[serde(rename = "none")]
    Skip,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Dest => "dest",
            Self::Newer => "newer",
            Self::Skip => "none",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "dest" => Ok(Self::Dest),
            "newer" | "new" => Ok(Self::Newer),
            "none" | "no" | "skip" => Ok(Self::Skip),
            _ => Err(Error::UnknownVariant {
                kind: "conflict policy",
                value: s.to_string(),
                expected: "source, dest, newer, none",
            }),
        }
    }
}

/// When file contents are checksummed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrcMode {
    /// Compare size and modification time only
    #[default]
    None,
    /// Checksum only to confirm records that already agree on size and time
    Match,
    /// Checksum every file during the scan and compare checksums only
    All,
}

impl CrcMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Match => "match",
            Self::All => "all",
        }
    }

    /// Mode used when comparing two snapshots.
    ///
    /// Snapshots built under different modes are compared with `Match`.
    pub fn effective(self, other: CrcMode) -> CrcMode {
        if self == other { self } else { CrcMode::Match }
    }
}

impl fmt::Display for CrcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrcMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "match" => Ok(Self::Match),
            "all" => Ok(Self::All),
            _ => Err(Error::UnknownVariant {
                kind: "crc mode",
                value: s.to_string(),
                expected: "none, match, all",
            }),
        }
    }
}
