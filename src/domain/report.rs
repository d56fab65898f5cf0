//! Check report types
//!
//! Collects one outcome per locked dependency and derives the run verdict.

use super::CheckOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report of a full freshness check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Lockfile the dependencies were read from
    pub lockfile: PathBuf,
    /// Registry that was queried
    pub registry: String,
    /// When the check started
    pub checked_at: DateTime<Utc>,
    /// Outcomes in lockfile order
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    /// Creates an empty report
    pub fn new(lockfile: impl Into<PathBuf>, registry: impl Into<String>) -> Self {
        Self {
            lockfile: lockfile.into(),
            registry: registry.into(),
            checked_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    /// Adds an outcome
    pub fn add_outcome(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the total number of checked dependencies
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of dependencies on their latest version
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_current()).count()
    }

    /// Returns the number of failed checks
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Returns the number of skipped checks
    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skip()).count()
    }

    /// Returns all failed outcomes
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Returns all skipped outcomes
    pub fn skips(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.is_skip())
    }

    /// Returns true when no check failed
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}
