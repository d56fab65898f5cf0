//! Check decision result types

use super::DependencySpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of looking up one package in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryLookupResult {
    /// Package name as queried
    pub name: String,
    /// Latest published version, absent when the lookup failed
    pub latest_version: Option<String>,
    /// Error message when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistryLookupResult {
    /// Creates a successful lookup result
    pub fn found(name: impl Into<String>, latest_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest_version: Some(latest_version.into()),
            error: None,
        }
    }

    /// Creates a failed lookup result
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest_version: None,
            error: Some(error.into()),
        }
    }
}

/// Reason why a dependency check failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum FailureReason {
    /// Locked version differs from the latest version
    Outdated,
    /// The registry lookup failed
    LookupFailed(String),
}

/// Reason why a dependency was not compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "constraint", rename_all = "snake_case")]
pub enum SkipReason {
    /// Manifest freezes the dependency to an exact version
    Frozen(String),
    /// Package was ignored via --ignore
    Ignored,
    /// Package not in --only list
    NotSelected,
    /// Package is not resolved from the registry (git, path, url)
    NotOnRegistry,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Frozen(constraint) => write!(f, "frozen by constraint {}", constraint),
            SkipReason::Ignored => write!(f, "ignored by --ignore"),
            SkipReason::NotSelected => write!(f, "not in --only list"),
            SkipReason::NotOnRegistry => write!(f, "not resolved from the registry"),
        }
    }
}

/// Status of a single dependency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Locked version is the latest version
    Passed,
    /// Dependency is outdated or could not be looked up
    Failed { failure: FailureReason },
    /// Dependency was not compared
    Skipped { skip: SkipReason },
}

/// Outcome of checking one locked dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Package name
    pub name: String,
    /// Version recorded in the lockfile
    pub pinned_version: String,
    /// Latest version reported by the registry
    pub latest_version: Option<String>,
    /// Whether the locked version is the latest version
    pub is_current: bool,
    /// Exact version the manifest freezes this dependency to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_by: Option<String>,
    /// Check status
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckOutcome {
    /// Creates a passed outcome
    pub fn passed(dependency: &DependencySpec, latest_version: impl Into<String>) -> Self {
        Self::with_status(
            dependency,
            Some(latest_version.into()),
            CheckStatus::Passed,
        )
    }

    /// Creates an outdated outcome
    pub fn outdated(dependency: &DependencySpec, latest_version: impl Into<String>) -> Self {
        Self::with_status(
            dependency,
            Some(latest_version.into()),
            CheckStatus::Failed {
                failure: FailureReason::Outdated,
            },
        )
    }

    /// Creates an outcome for a failed registry lookup
    pub fn lookup_failed(dependency: &DependencySpec, message: impl Into<String>) -> Self {
        Self::with_status(
            dependency,
            None,
            CheckStatus::Failed {
                failure: FailureReason::LookupFailed(message.into()),
            },
        )
    }

    /// Creates a skipped outcome
    pub fn skipped(
        dependency: &DependencySpec,
        latest_version: Option<String>,
        reason: SkipReason,
    ) -> Self {
        Self::with_status(dependency, latest_version, CheckStatus::Skipped { skip: reason })
    }

    fn with_status(
        dependency: &DependencySpec,
        latest_version: Option<String>,
        status: CheckStatus,
    ) -> Self {
        Self {
            name: dependency.name.clone(),
            pinned_version: dependency.pinned_version.clone(),
            latest_version,
            is_current: matches!(status, CheckStatus::Passed),
            frozen_by: dependency
                .constraint
                .as_ref()
                .filter(|c| c.is_frozen())
                .map(|c| c.raw.clone()),
            status,
        }
    }

    /// Returns true if the locked version is the latest version
    pub fn is_current(&self) -> bool {
        matches!(self.status, CheckStatus::Passed)
    }

    /// Returns true if this outcome fails the run
    pub fn is_failure(&self) -> bool {
        matches!(self.status, CheckStatus::Failed { .. })
    }

    /// Returns true if the dependency was not compared
    pub fn is_skip(&self) -> bool {
        matches!(self.status, CheckStatus::Skipped { .. })
    }

    /// Returns the skip reason, if any
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            CheckStatus::Skipped { skip } => Some(skip),
            _ => None,
        }
    }

    /// Human readable message naming the dependency and both versions
    pub fn message(&self) -> String {
        let latest = self.latest_version.as_deref().unwrap_or("unknown");
        match &self.status {
            CheckStatus::Passed => {
                format!("{} is on latest version at {}", self.name, self.pinned_version)
            }
            CheckStatus::Failed {
                failure: FailureReason::Outdated,
            } => {
                let message = if crate::check::is_older(&self.pinned_version, latest) {
                    format!(
                        "{} is not up to date, {} < {}",
                        self.name, self.pinned_version, latest
                    )
                } else {
                    format!(
                        "{} {} does not match latest {}",
                        self.name, self.pinned_version, latest
                    )
                };
                match &self.frozen_by {
                    Some(constraint) => {
                        format!("{} (frozen by constraint {})", message, constraint)
                    }
                    None => message,
                }
            }
            CheckStatus::Failed {
                failure: FailureReason::LookupFailed(message),
            } => format!(
                "{} {}: registry lookup failed: {}",
                self.name, self.pinned_version, message
            ),
            CheckStatus::Skipped {
                skip: SkipReason::Frozen(constraint),
            } => format!(
                "{} is frozen by constraint {}. Version {} is used, but {} is available.",
                self.name, constraint, self.pinned_version, latest
            ),
            CheckStatus::Skipped { skip } => {
                format!("{} {} skipped: {}", self.name, self.pinned_version, skip)
            }
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
