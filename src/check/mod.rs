//! Freshness judgment for locked dependencies
//!
//! This module provides:
//! - Check filter configuration from CLI args
//! - Version normalization and strict comparison
//! - The judge that turns a registry lookup into a check outcome

mod filter;
mod version;

pub use filter::CheckFilter;
pub use version::{compare_versions, is_older, normalize_version, versions_equal};

use crate::domain::{CheckOutcome, DependencySpec, RegistryLookupResult, SkipReason};

/// Judgment engine that decides whether a dependency is current
#[derive(Debug, Clone, Default)]
pub struct FreshnessJudge {
    filter: CheckFilter,
    /// Report outdated frozen dependencies as skipped instead of failed
    allow_frozen: bool,
}

impl FreshnessJudge {
    /// Create a new FreshnessJudge with the given filter
    pub fn new(filter: CheckFilter) -> Self {
        Self {
            filter,
            allow_frozen: false,
        }
    }

    /// Let dependencies frozen by the manifest lag behind the registry
    pub fn with_allow_frozen(mut self, allow_frozen: bool) -> Self {
        self.allow_frozen = allow_frozen;
        self
    }

    /// Check if a dependency should be compared at all
    /// Returns Some(SkipReason) if it needs no registry lookup
    pub fn should_skip(&self, dependency: &DependencySpec) -> Option<SkipReason> {
        if let Some(reason) = self.filter.skip_reason(&dependency.name) {
            return Some(reason);
        }
        if !dependency.source.is_registry() {
            return Some(SkipReason::NotOnRegistry);
        }
        None
    }

    /// Judge a dependency against its registry lookup result
    pub fn judge(
        &self,
        dependency: &DependencySpec,
        lookup: &RegistryLookupResult,
    ) -> CheckOutcome {
        if let Some(reason) = self.should_skip(dependency) {
            return CheckOutcome::skipped(dependency, None, reason);
        }

        let latest = match &lookup.latest_version {
            Some(latest) => latest,
            None => {
                let message = lookup
                    .error
                    .clone()
                    .unwrap_or_else(|| "registry reported no version".to_string());
                return CheckOutcome::lookup_failed(dependency, message);
            }
        };

        if versions_equal(&dependency.pinned_version, latest) {
            return CheckOutcome::passed(dependency, latest.clone());
        }

        if let Some(constraint) = dependency
            .constraint
            .as_ref()
            .filter(|c| self.allow_frozen && c.is_frozen())
        {
            return CheckOutcome::skipped(
                dependency,
                Some(latest.clone()),
                SkipReason::Frozen(constraint.raw.clone()),
            );
        }

        CheckOutcome::outdated(dependency, latest.clone())
    }
}
