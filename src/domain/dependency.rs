//! Locked dependency structures

use super::Constraint;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a package name the way the registry does (PEP 503)
///
/// `Flask_SQLAlchemy`, `flask.sqlalchemy` and `flask-sqlalchemy` all map to
/// `flask-sqlalchemy`.
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RUN_RE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Where a locked package was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PackageSource {
    /// Resolved from a package index
    Registry,
    /// Resolved from a git repository, local directory, file, URL or editable path
    Other(String),
}

impl PackageSource {
    /// Returns true if the package can be looked up in the registry
    pub fn is_registry(&self) -> bool {
        matches!(self, PackageSource::Registry)
    }
}

/// A dependency as pinned in the lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Package name as written in the lockfile
    pub name: String,
    /// Exact version recorded in the lockfile
    pub pinned_version: String,
    /// Where the package was resolved from
    pub source: PackageSource,
    /// Constraint declared in the manifest, if the package is a direct dependency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl DependencySpec {
    /// Creates a new registry dependency
    pub fn new(name: impl Into<String>, pinned_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pinned_version: pinned_version.into(),
            source: PackageSource::Registry,
            constraint: None,
        }
    }

    /// Sets the package source (builder pattern)
    pub fn with_source(mut self, source: PackageSource) -> Self {
        self.source = source;
        self
    }

    /// Attaches the manifest constraint (builder pattern)
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Returns the normalized package name
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Returns true if the manifest freezes this dependency to one exact version
    pub fn is_frozen(&self) -> bool {
        self.constraint.as_ref().is_some_and(Constraint::is_frozen)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.pinned_version)
    }
}
