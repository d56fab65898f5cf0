//! poetry.lock / uv.lock parser
//!
//! Both formats record resolved packages as `[[package]]` tables with
//! `name` and `version`. They differ only in how non-registry sources are
//! written:
//! - Poetry: `[package.source]` with `type = "git" | "directory" | "file" | "url" | "legacy"`
//! - uv: inline `source = { registry = "..." }` or `{ editable | virtual | git | path | directory | url = "..." }`

use crate::domain::{normalize_name, DependencySpec, PackageSource};
use crate::error::LockfileError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Version placeholder for non-registry packages that record no version
const UNKNOWN_VERSION: &str = "unknown";

#[derive(Debug, Deserialize)]
struct RawLockfile {
    #[serde(default)]
    package: Vec<RawPackage>,
    /// Poetry writes a `[metadata]` table
    metadata: Option<toml::Table>,
    /// uv writes a top-level lock format `version`
    version: Option<toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    version: Option<String>,
    source: Option<toml::Table>,
}

impl RawPackage {
    fn package_source(&self) -> PackageSource {
        let Some(source) = &self.source else {
            return PackageSource::Registry;
        };

        if let Some(kind) = source.get("type").and_then(|t| t.as_str()) {
            return PackageSource::Other(kind.to_string());
        }
        if source.contains_key("registry") {
            return PackageSource::Registry;
        }
        match source.keys().next() {
            Some(kind) => PackageSource::Other(kind.clone()),
            None => PackageSource::Registry,
        }
    }
}

/// Parse lockfile content into the ordered list of locked dependencies
///
/// Names must be unique after normalization. A package listed twice at the
/// same version is collapsed; at different versions it is an error.
pub fn parse_lockfile(content: &str, path: &Path) -> Result<Vec<DependencySpec>, LockfileError> {
    let raw: RawLockfile =
        toml::from_str(content).map_err(|e| LockfileError::parse_error(path, e.to_string()))?;

    if raw.package.is_empty() && raw.metadata.is_none() && raw.version.is_none() {
        return Err(LockfileError::parse_error(
            path,
            "not a poetry or uv lockfile (no [[package]], [metadata] or version)",
        ));
    }

    let mut dependencies: Vec<DependencySpec> = Vec::with_capacity(raw.package.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for package in raw.package {
        let source = package.package_source();
        let version = match (&package.version, source.is_registry()) {
            (Some(v), _) => v.clone(),
            (None, false) => UNKNOWN_VERSION.to_string(),
            (None, true) => {
                return Err(LockfileError::parse_error(
                    path,
                    format!("package '{}' has no version", package.name),
                ));
            }
        };

        let key = normalize_name(&package.name);
        if let Some(&index) = seen.get(&key) {
            let existing = &dependencies[index];
            if existing.pinned_version == version {
                continue;
            }
            return Err(LockfileError::AmbiguousPackage {
                path: path.to_path_buf(),
                name: package.name,
                first: existing.pinned_version.clone(),
                second: version,
            });
        }

        seen.insert(key, dependencies.len());
        dependencies.push(DependencySpec::new(package.name, version).with_source(source));
    }

    Ok(dependencies)
}
