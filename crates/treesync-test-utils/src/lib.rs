//! Shared test utilities for the treesync workspace.
//!
//! This crate provides directory-tree fixtures so every crate's tests build
//! source and destination trees the same way. It is a dev-dependency only
//! and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for files with explicit modification times

pub mod tree;

pub use tree::TestTree;
