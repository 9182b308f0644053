//! Recoverable removal
//!
//! Files about to be overwritten or deleted are moved under
//! `<root>/<archive_dir>/<timestamp>/` instead of being destroyed.

mod archiver;

pub use archiver::Archiver;
