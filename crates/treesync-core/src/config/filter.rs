//! Regex allow-list for relative paths

use regex::Regex;

use crate::{Error, Result};

/// A set of patterns restricting which relative paths take part in a diff.
///
/// A path is allowed when it matches at least one pattern at its start.
/// An empty filter allows every path.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<Regex>,
}

impl PathFilter {
    /// Compile a filter from pattern strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] for the first pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(&format!("^(?:{})", pattern)).map_err(|source| Error::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Filter that allows every path.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check whether a relative path passes the filter.
    pub fn allows(&self, path: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|r| r.is_match(path))
    }
}
