//! Check runner coordinating the freshness workflow
//!
//! This module provides:
//! - Workflow coordination: locate → parse → scope → look up → judge → report
//! - Validated run configuration built from CLI arguments
//! - Sequential or bounded concurrent registry queries, in lockfile order
//! - Per-dependency error handling so one failed lookup never stops the run

use crate::check::{CheckFilter, FreshnessJudge};
use crate::cli::CliArgs;
use crate::domain::{normalize_name, CheckOutcome, CheckReport, DependencySpec};
use crate::error::{AppError, ConfigError};
use crate::lockfile::{detect_lockfile, read_lockfile};
use crate::manifest::{apply_constraints, detect_manifest, read_manifest, scope_to_declared};
use crate::progress::Progress;
use crate::registry::{
    HttpClient, PyPIAdapter, RegistryAdapter, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, PYPI_API_URL,
};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Validated configuration for a check run
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Project directory searched for the lockfile and manifest
    pub path: PathBuf,
    /// Explicit lockfile path
    pub lockfile: Option<PathBuf>,
    /// Explicit manifest path
    pub manifest: Option<PathBuf>,
    /// Check every locked package instead of the direct dependencies
    pub all: bool,
    /// Skip outdated dependencies the manifest freezes to an exact version
    pub allow_frozen: bool,
    /// Packages never compared
    pub ignore: Vec<String>,
    /// If non-empty, the only packages compared
    pub only: Vec<String>,
    /// Base URL of the registry JSON API
    pub registry_url: String,
    /// Timeout per registry request
    pub timeout: Duration,
    /// Retries per registry request
    pub retries: u32,
    /// Registry requests in flight at once
    pub jobs: usize,
    /// Whether to draw progress on stderr
    pub show_progress: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            lockfile: None,
            manifest: None,
            all: false,
            allow_frozen: false,
            ignore: Vec::new(),
            only: Vec::new(),
            registry_url: PYPI_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_MAX_RETRIES,
            jobs: 1,
            show_progress: false,
        }
    }
}

impl CheckConfig {
    /// Build and validate the configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let config = Self {
            path: args.path.clone(),
            lockfile: args.lockfile.clone(),
            manifest: args.manifest.clone(),
            all: args.all,
            allow_frozen: args.allow_frozen,
            ignore: args.ignore.clone(),
            only: args.only.clone(),
            registry_url: args.registry_url.clone(),
            timeout: Duration::from_secs(args.timeout),
            retries: args.retries,
            jobs: args.jobs,
            show_progress: args.show_progress(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot produce a meaningful run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::InvalidValue {
                option: "--jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                option: "--timeout".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        let url = reqwest::Url::parse(&self.registry_url).map_err(|e| {
            ConfigError::InvalidRegistryUrl {
                value: self.registry_url.clone(),
                message: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRegistryUrl {
                value: self.registry_url.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let ignored: Vec<String> = self.ignore.iter().map(|n| normalize_name(n)).collect();
        if let Some(name) = self.only.iter().find(|n| ignored.contains(&normalize_name(n))) {
            return Err(ConfigError::ConflictingOptions {
                message: format!("'{}' is passed to both --only and --ignore", name),
            });
        }

        Ok(())
    }

    /// Build the check filter from the package options
    fn filter(&self) -> CheckFilter {
        let mut filter = CheckFilter::new();
        if !self.ignore.is_empty() {
            filter = filter.with_ignore(self.ignore.clone());
        }
        if !self.only.is_empty() {
            filter = filter.with_only(self.only.clone());
        }
        filter
    }
}

/// Runner for the freshness check workflow
pub struct Checker {
    /// Run configuration
    config: CheckConfig,
    /// Registry the latest versions are looked up in
    adapter: Arc<dyn RegistryAdapter>,
}

impl Checker {
    /// Create a checker querying the configured PyPI-compatible registry
    pub fn new(config: CheckConfig) -> Result<Self, AppError> {
        config.validate()?;
        let client = HttpClient::with_timeout(config.timeout)?.with_max_retries(config.retries);
        let adapter = Arc::new(PyPIAdapter::with_base_url(client, &config.registry_url));
        Ok(Self { config, adapter })
    }

    /// Create a checker with a custom registry adapter (for testing)
    pub fn with_adapter(config: CheckConfig, adapter: Arc<dyn RegistryAdapter>) -> Self {
        Self { config, adapter }
    }

    /// Resolve the lockfile path from the configuration
    pub fn lockfile_path(&self) -> Result<PathBuf, AppError> {
        match &self.config.lockfile {
            Some(path) => Ok(path.clone()),
            None => Ok(detect_lockfile(&self.config.path)?),
        }
    }

    /// Resolve the manifest path, looking next to the lockfile when not given
    fn manifest_path(&self, lockfile: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config.manifest {
            return Some(path.clone());
        }
        let dir = match lockfile.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        detect_manifest(dir)
    }

    /// Read the lockfile and narrow it down to the dependencies in scope
    ///
    /// Everything fatal happens here, before any registry request.
    pub fn load_dependencies(&self) -> Result<(PathBuf, Vec<DependencySpec>), AppError> {
        let lockfile = self.lockfile_path()?;
        let locked = read_lockfile(&lockfile)?;
        tracing::debug!(lockfile = %lockfile.display(), packages = locked.len(), "read lockfile");

        let Some(manifest) = self.manifest_path(&lockfile) else {
            return Ok((lockfile, locked));
        };

        let declared = read_manifest(&manifest)?;
        tracing::debug!(
            manifest = %manifest.display(),
            declared = declared.len(),
            "read manifest"
        );

        let dependencies = if self.config.all {
            apply_constraints(locked, &declared)
        } else {
            scope_to_declared(locked, &declared, &lockfile)?
        };
        Ok((lockfile, dependencies))
    }

    /// Run the check workflow
    pub async fn run(&self) -> Result<CheckReport, AppError> {
        let mut progress = Progress::new(self.config.show_progress);

        progress.spinner("Reading lockfile...");
        let loaded = self.load_dependencies();
        progress.finish_and_clear();
        let (lockfile, dependencies) = loaded?;

        let mut report = CheckReport::new(&lockfile, self.adapter.base_url());
        let judge =
            FreshnessJudge::new(self.config.filter()).with_allow_frozen(self.config.allow_frozen);

        progress.start(dependencies.len() as u64, "Checking dependencies");
        let outcomes = self.check_all(&dependencies, &judge, &progress).await;
        progress.finish_and_clear();

        for outcome in outcomes {
            report.add_outcome(outcome);
        }

        tracing::info!(
            total = report.total(),
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "check finished"
        );

        Ok(report)
    }

    /// Check all dependencies with at most `jobs` lookups in flight
    ///
    /// Outcomes come back in the order of `dependencies`.
    async fn check_all(
        &self,
        dependencies: &[DependencySpec],
        judge: &FreshnessJudge,
        progress: &Progress,
    ) -> Vec<CheckOutcome> {
        stream::iter(dependencies)
            .map(|dep| self.check_one(dep, judge, progress))
            .buffered(self.config.jobs.max(1))
            .collect::<Vec<_>>()
            .await
    }

    /// Check a single dependency
    async fn check_one(
        &self,
        dependency: &DependencySpec,
        judge: &FreshnessJudge,
        progress: &Progress,
    ) -> CheckOutcome {
        progress.set_message(&format!("Checking {}", dependency.name));

        let outcome = match judge.should_skip(dependency) {
            Some(reason) => {
                tracing::debug!(package = %dependency.name, %reason, "skipping lookup");
                CheckOutcome::skipped(dependency, None, reason)
            }
            None => {
                let lookup = self.adapter.lookup(&dependency.name).await;
                judge.judge(dependency, &lookup)
            }
        };

        progress.inc();
        outcome
    }
}
