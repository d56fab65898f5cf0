//! CLI argument parsing module for lockfresh

use crate::registry::PYPI_API_URL;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Environment variable overriding the registry URL
pub const REGISTRY_URL_ENV: &str = "LOCKFRESH_REGISTRY_URL";

/// Lockfile freshness checker for Python projects
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lockfresh",
    version,
    about = "Fail when locked Python dependencies are behind the latest PyPI release"
)]
pub struct CliArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Input options
    /// Lockfile to check instead of poetry.lock / uv.lock in the project directory
    ///
    /// Without --manifest, the pyproject.toml next to this lockfile is used,
    /// not the one in the project directory.
    #[arg(long, value_name = "PATH")]
    pub lockfile: Option<PathBuf>,

    /// pyproject.toml to read direct dependencies and frozen constraints from
    /// (default: the one next to the lockfile)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Check every locked package, not only the direct dependencies
    #[arg(long)]
    pub all: bool,

    /// Skip, instead of fail, dependencies the manifest freezes to an exact
    /// version that is behind the latest release
    #[arg(long)]
    pub allow_frozen: bool,

    // Package filters
    /// Do not check a package (can be specified multiple times)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Check only specific packages (can be specified multiple times)
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub only: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long, conflicts_with = "junit")]
    pub json: bool,

    /// Output results as JUnit XML
    #[arg(long)]
    pub junit: bool,

    /// Also write a JUnit XML report to this file
    #[arg(long = "junit-xml", value_name = "PATH")]
    pub junit_xml: Option<PathBuf>,

    // Registry options
    /// Base URL of a PyPI-compatible JSON API
    #[arg(long, value_name = "URL", env = REGISTRY_URL_ENV, default_value = PYPI_API_URL)]
    pub registry_url: String,

    /// Timeout for each registry request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Retries for failed registry requests
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub retries: u32,

    /// Number of registry requests in flight at once
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Check if the report on stdout is meant for machines
    pub fn has_machine_output(&self) -> bool {
        self.json || self.junit
    }

    /// Check if a progress bar should be drawn on stderr
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.has_machine_output()
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["lockfresh"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.lockfile.is_none());
        assert!(args.manifest.is_none());
        assert!(!args.all);
        assert!(!args.allow_frozen);
        assert!(args.ignore.is_empty());
        assert!(args.only.is_empty());
        assert!(!args.json);
        assert!(!args.junit);
        assert!(args.junit_xml.is_none());
        assert_eq!(args.timeout, 30);
        assert_eq!(args.retries, 3);
        assert_eq!(args.jobs, 1);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.no_color);
    }

    #[test]
    fn test_default_registry_url() {
        // Only meaningful when the environment does not override it
        if std::env::var_os(REGISTRY_URL_ENV).is_none() {
            let args = CliArgs::parse_from(["lockfresh"]);
            assert_eq!(args.registry_url, "https://pypi.org/pypi");
        }
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["lockfresh", "/some/project"]);
        assert_eq!(args.path, PathBuf::from("/some/project"));
    }

    #[test]
    fn test_lockfile_and_manifest_paths() {
        let args = CliArgs::parse_from([
            "lockfresh",
            "--lockfile",
            "deps/poetry.lock",
            "--manifest",
            "deps/pyproject.toml",
        ]);
        assert_eq!(args.lockfile, Some(PathBuf::from("deps/poetry.lock")));
        assert_eq!(args.manifest, Some(PathBuf::from("deps/pyproject.toml")));
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["lockfresh", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["lockfresh", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_ignore_multiple() {
        let args = CliArgs::parse_from(["lockfresh", "--ignore", "foo", "--ignore", "bar"]);
        assert_eq!(args.ignore, vec!["foo", "bar"]);
    }

    #[test]
    fn test_only_multiple() {
        let args = CliArgs::parse_from(["lockfresh", "--only", "foo", "--only", "bar"]);
        assert_eq!(args.only, vec!["foo", "bar"]);
    }

    #[test]
    fn test_json_and_junit_conflict() {
        let result = CliArgs::try_parse_from(["lockfresh", "--json", "--junit"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_junit_xml_with_json() {
        let args = CliArgs::parse_from(["lockfresh", "--json", "--junit-xml", "report.xml"]);
        assert!(args.json);
        assert_eq!(args.junit_xml, Some(PathBuf::from("report.xml")));
    }

    #[test]
    fn test_registry_options() {
        let args = CliArgs::parse_from([
            "lockfresh",
            "--registry-url",
            "http://localhost:8080/pypi",
            "--timeout",
            "5",
            "--retries",
            "0",
            "--jobs",
            "8",
        ]);
        assert_eq!(args.registry_url, "http://localhost:8080/pypi");
        assert_eq!(args.timeout, 5);
        assert_eq!(args.retries, 0);
        assert_eq!(args.jobs, 8);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        assert!(CliArgs::try_parse_from(["lockfresh", "--jobs", "many"]).is_err());
        assert!(CliArgs::try_parse_from(["lockfresh", "--timeout", "-1"]).is_err());
    }

    #[test]
    fn test_show_progress() {
        assert!(CliArgs::parse_from(["lockfresh"]).show_progress());
        assert!(!CliArgs::parse_from(["lockfresh", "-q"]).show_progress());
        assert!(!CliArgs::parse_from(["lockfresh", "--json"]).show_progress());
        assert!(!CliArgs::parse_from(["lockfresh", "--junit"]).show_progress());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(CliArgs::parse_from(["lockfresh"]).log_level(), "warn");
        assert_eq!(
            CliArgs::parse_from(["lockfresh", "--verbose"]).log_level(),
            "debug"
        );
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "lockfresh",
            "/path/to/project",
            "--all",
            "--allow-frozen",
            "--verbose",
            "--ignore",
            "black",
            "--junit",
            "--no-color",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/project"));
        assert!(args.all);
        assert!(args.allow_frozen);
        assert!(args.verbose);
        assert_eq!(args.ignore, vec!["black"]);
        assert!(args.junit);
        assert!(args.no_color);
    }
}
