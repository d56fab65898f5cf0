//! Integration tests for lockfresh
//!
//! These tests verify:
//! - Lockfile detection and parsing for poetry.lock and uv.lock projects
//! - Scoping to pyproject.toml direct dependencies
//! - The full check workflow against an in-memory registry
//! - Report output for every format from the same run

use async_trait::async_trait;
use lockfresh::checker::{CheckConfig, Checker};
use lockfresh::domain::{CheckReport, SkipReason};
use lockfresh::error::{AppError, RegistryError};
use lockfresh::lockfile::{detect_lockfile, read_lockfile};
use lockfresh::manifest::{read_manifest, scope_to_declared};
use lockfresh::output::{create_formatter, OutputConfig, OutputFormat, Verbosity};
use lockfresh::registry::RegistryAdapter;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

const POETRY_LOCK: &str = r#"
[[package]]
name = "certifi"
version = "2023.7.22"
description = "Python package for providing Mozilla's CA Bundle."
optional = false
python-versions = ">=3.6"

[[package]]
name = "charset-normalizer"
version = "3.2.0"
optional = false
python-versions = ">=3.7.0"

[[package]]
name = "click"
version = "8.1.3"
optional = false
python-versions = ">=3.7"

[[package]]
name = "mylib"
version = "0.3.0"
optional = false
python-versions = "*"

[package.source]
type = "git"
url = "https://github.com/example/mylib.git"
reference = "main"
resolved_reference = "0b1c2d3e"

[[package]]
name = "requests"
version = "2.28.0"
optional = false
python-versions = ">=3.7, <4"

[package.dependencies]
certifi = ">=2017.4.17"
charset-normalizer = ">=2,<4"

[[package]]
name = "urllib3"
version = "1.26.18"
optional = false
python-versions = ">=2.7"

[metadata]
lock-version = "2.0"
python-versions = "^3.11"
content-hash = "f00d"
"#;

const PYPROJECT: &str = r#"
[tool.poetry]
name = "service"
version = "0.1.0"

[tool.poetry.dependencies]
python = "^3.11"
requests = "^2.28"
urllib3 = "1.26.18"
mylib = { git = "https://github.com/example/mylib.git" }

[tool.poetry.group.dev.dependencies]
click = "^8.1"
"#;

/// In-memory registry with fixed latest versions
struct StaticRegistry {
    latest: HashMap<&'static str, &'static str>,
}

impl StaticRegistry {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            latest: HashMap::from([
                ("certifi", "2024.2.2"),
                ("charset-normalizer", "3.2.0"),
                ("click", "8.1.3"),
                ("requests", "2.31.0"),
                ("urllib3", "2.2.1"),
            ]),
        })
    }
}

#[async_trait]
impl RegistryAdapter for StaticRegistry {
    fn registry_name(&self) -> &str {
        "static"
    }

    fn base_url(&self) -> &str {
        "http://registry.test/pypi"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        self.latest
            .get(package)
            .map(|v| v.to_string())
            .ok_or_else(|| RegistryError::package_not_found(package, "static"))
    }
}

fn project(with_manifest: bool) -> TempDir {
    let dir = create_test_dir();
    fs::write(dir.path().join("poetry.lock"), POETRY_LOCK).unwrap();
    if with_manifest {
        fs::write(dir.path().join("pyproject.toml"), PYPROJECT).unwrap();
    }
    dir
}

async fn run_check(dir: &TempDir, config: CheckConfig) -> Result<CheckReport, AppError> {
    let config = CheckConfig {
        path: dir.path().to_path_buf(),
        ..config
    };
    Checker::with_adapter(config, StaticRegistry::new())
        .run()
        .await
}

mod lockfile_parsing {
    use super::*;

    #[test]
    fn test_detect_and_read_poetry_lock() {
        let dir = project(false);
        let path = detect_lockfile(dir.path()).unwrap();
        let deps = read_lockfile(&path).unwrap();

        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["certifi", "charset-normalizer", "click", "mylib", "requests", "urllib3"]
        );
        assert!(!deps[3].source.is_registry());
    }

    #[test]
    fn test_detect_and_read_uv_lock() {
        let dir = create_test_dir();
        let uv_lock = r#"
version = 1
requires-python = ">=3.12"

[[package]]
name = "service"
version = "0.1.0"
source = { virtual = "." }
dependencies = [{ name = "httpx" }]

[[package]]
name = "httpx"
version = "0.27.0"
source = { registry = "https://pypi.org/simple" }
sdist = { url = "https://files.pythonhosted.org/httpx-0.27.0.tar.gz", hash = "sha256:00", size = 1 }
"#;
        fs::write(dir.path().join("uv.lock"), uv_lock).unwrap();

        let path = detect_lockfile(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "uv.lock");

        let deps = read_lockfile(&path).unwrap();
        assert_eq!(deps.len(), 2);
        assert!(!deps[0].source.is_registry());
        assert!(deps[1].source.is_registry());
        assert_eq!(deps[1].pinned_version, "0.27.0");
    }
}

mod manifest_scoping {
    use super::*;

    #[test]
    fn test_scope_to_direct_dependencies() {
        let dir = project(true);
        let locked = read_lockfile(&dir.path().join("poetry.lock")).unwrap();
        let declared = read_manifest(&dir.path().join("pyproject.toml")).unwrap();

        let scoped =
            scope_to_declared(locked, &declared, &dir.path().join("poetry.lock")).unwrap();
        let names: Vec<_> = scoped.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["click", "mylib", "requests", "urllib3"]);

        let urllib3 = scoped.iter().find(|d| d.name == "urllib3").unwrap();
        assert!(urllib3.is_frozen());
        let mylib = scoped.iter().find(|d| d.name == "mylib").unwrap();
        assert!(mylib.constraint.is_none());
    }
}

mod checker_workflow {
    use super::*;

    #[tokio::test]
    async fn test_direct_dependencies_with_frozen_constraint() {
        let dir = project(true);
        let report = run_check(&dir, CheckConfig::default()).await.unwrap();

        // click passes, requests is outdated, urllib3 is frozen but behind, mylib is a git dependency
        assert_eq!(report.total(), 4);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(!report.is_success());

        let failures: Vec<_> = report.failures().map(|o| o.message()).collect();
        assert_eq!(
            failures,
            vec![
                "requests is not up to date, 2.28.0 < 2.31.0".to_string(),
                "urllib3 is not up to date, 1.26.18 < 2.2.1 (frozen by constraint 1.26.18)"
                    .to_string(),
            ]
        );

        let reasons: Vec<_> = report.skips().filter_map(|o| o.skip_reason()).collect();
        assert_eq!(reasons, vec![&SkipReason::NotOnRegistry]);
    }

    #[tokio::test]
    async fn test_allow_frozen_skips_frozen_dependency() {
        let dir = project(true);
        let config = CheckConfig {
            allow_frozen: true,
            ..CheckConfig::default()
        };
        let report = run_check(&dir, config).await.unwrap();

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 2);
        let reasons: Vec<_> = report.skips().filter_map(|o| o.skip_reason()).collect();
        assert!(reasons.contains(&&SkipReason::Frozen("1.26.18".to_string())));
    }

    #[tokio::test]
    async fn test_all_packages_keep_frozen_constraints() {
        let dir = project(true);
        let config = CheckConfig {
            all: true,
            allow_frozen: true,
            jobs: 4,
            ..CheckConfig::default()
        };
        let report = run_check(&dir, config).await.unwrap();

        assert_eq!(report.total(), 6);
        // certifi and requests are outdated
        assert_eq!(report.failed_count(), 2);
        let urllib3 = report.outcomes.iter().find(|o| o.name == "urllib3").unwrap();
        assert!(urllib3.is_skip());
    }

    #[tokio::test]
    async fn test_without_manifest_every_package_is_checked() {
        let dir = project(false);
        let report = run_check(&dir, CheckConfig::default()).await.unwrap();

        assert_eq!(report.total(), 6);
        // certifi, requests and urllib3 are outdated
        assert_eq!(report.failed_count(), 3);
        assert_eq!(report.skipped_count(), 1);
        let urllib3 = report.outcomes.iter().find(|o| o.name == "urllib3").unwrap();
        assert!(urllib3.frozen_by.is_none());
    }

    #[tokio::test]
    async fn test_only_outdated_packages_ignored_passes() {
        let dir = project(true);
        let config = CheckConfig {
            ignore: vec!["requests".to_string(), "URLLIB3".to_string()],
            ..CheckConfig::default()
        };
        let report = run_check(&dir, config).await.unwrap();
        assert!(report.is_success());
    }
}

mod report_output {
    use super::*;

    fn render(report: &CheckReport, format: OutputFormat) -> String {
        let config = OutputConfig {
            format,
            verbosity: Verbosity::Normal,
            color: false,
        };
        let mut output = Vec::new();
        create_formatter(config).format(report, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_formats_agree_on_counts() {
        let dir = project(true);
        let report = run_check(&dir, CheckConfig::default()).await.unwrap();

        let text = render(&report, OutputFormat::Text);
        assert!(text.contains("2 failed, 1 passed, 1 skipped"));
        assert!(text.contains("requests is not up to date, 2.28.0 < 2.31.0"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json)).unwrap();
        assert_eq!(json["summary"]["failed"], 2);
        assert_eq!(json["summary"]["skipped"], 1);
        assert_eq!(json["registry"], "http://registry.test/pypi");
        let urllib3 = json["outcomes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["name"] == "urllib3")
            .unwrap();
        assert_eq!(urllib3["is_current"], false);
        assert_eq!(urllib3["frozen_by"], "1.26.18");

        let xml = render(&report, OutputFormat::Junit);
        assert!(xml.contains("tests=\"4\" failures=\"2\" errors=\"0\" skipped=\"1\""));
        assert_eq!(xml.matches("<testcase ").count(), 4);
    }
}
