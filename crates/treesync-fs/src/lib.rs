//! Filesystem primitives for treesync
//!
//! Provides forward-slash path handling, streaming checksums, atomic
//! writes and format-agnostic persistence of small structured files.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod csv;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{DEFAULT_METADATA_DIR, MetadataFile};
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_dir_name};
