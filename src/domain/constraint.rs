//! Version constraints declared in the manifest
//!
//! Handles constraint strings like:
//! - Poetry: `^2.28`, `~1.2.3`, `>=1.0,<2.0`, `1.2.3` (exact)
//! - PEP 621 / PEP 508: `>=2.28.0`, `==1.2.3`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// A fully qualified three-part release, optionally written with `==`
static FROZEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:==)?\s*(\d+)\.(\d+)\.(\d+)$").unwrap());

/// A version constraint as written in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// The raw constraint string
    pub raw: String,
}

impl Constraint {
    /// Creates a new Constraint
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into().trim().to_string(),
        }
    }

    /// Returns true if this constraint freezes the dependency to one exact release
    pub fn is_frozen(&self) -> bool {
        FROZEN_RE.is_match(&self.raw)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
