//! Check filter configuration
//!
//! Package names are compared after registry normalization, so
//! `--ignore Flask_Login` matches a locked `flask-login`.

use crate::domain::{normalize_name, SkipReason};

/// Filter configuration for freshness checks
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    /// Packages that are never compared
    pub ignore: Vec<String>,
    /// If non-empty, only these packages are compared
    pub only: Vec<String>,
}

impl CheckFilter {
    /// Create a new CheckFilter that checks everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set packages to ignore
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore.iter().map(|n| normalize_name(n)).collect();
        self
    }

    /// Set packages to check exclusively
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only.iter().map(|n| normalize_name(n)).collect();
        self
    }

    /// Returns the skip reason for a package, or None if it should be checked
    pub fn skip_reason(&self, name: &str) -> Option<SkipReason> {
        let name = normalize_name(name);
        if !self.only.is_empty() {
            return if self.only.contains(&name) {
                None
            } else {
                Some(SkipReason::NotSelected)
            };
        }
        if self.ignore.contains(&name) {
            return Some(SkipReason::Ignored);
        }
        None
    }
}
