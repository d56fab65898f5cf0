//! pyproject.toml parser for Python projects
//!
//! Handles:
//! - tool.poetry.dependencies (Poetry)
//! - tool.poetry.dev-dependencies (Poetry < 1.2)
//! - tool.poetry.group.<name>.dependencies (Poetry 1.2+)
//! - project.dependencies (PEP 621)
//! - project.optional-dependencies (PEP 621)
//! - dependency-groups (PEP 735, used by uv)
//! - tool.uv.dev-dependencies (uv legacy dev group)

use crate::domain::{normalize_name, Constraint};
use crate::error::ManifestError;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use toml::{Table, Value};

// Regex to split PEP 508 dependency specifiers into name and the rest
// Matches: package-name>=1.0,<2.0 or package-name==1.0 or package-name[extra]>=1.0
static PEP508_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9][-a-zA-Z0-9._]*)\s*(.*)$").unwrap());

/// A direct dependency declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Package name as written in the manifest
    pub name: String,
    /// Declared version constraint, absent for path/git/url dependencies
    pub constraint: Option<Constraint>,
}

impl DeclaredDependency {
    fn new(name: impl Into<String>, constraint: Option<Constraint>) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser;

impl PyprojectTomlParser {
    /// Parse the direct dependencies declared in pyproject.toml content
    ///
    /// The `python` interpreter requirement is not a dependency and is left out.
    /// A name declared in several groups is reported once, with its first constraint.
    pub fn parse(
        &self,
        content: &str,
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, ManifestError> {
        let document: Table = toml::from_str(content)
            .map_err(|e: toml::de::Error| ManifestError::toml_parse_error(path, e.to_string()))?;

        let mut dependencies = Vec::new();
        let poetry = document.get("tool").and_then(|t| t.get("poetry"));

        if let Some(deps) = poetry
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            for (name, value) in deps {
                dependencies.push(parse_poetry_dependency(name, value));
            }
        }

        if let Some(deps) = poetry
            .and_then(|p| p.get("dev-dependencies"))
            .and_then(|d| d.as_table())
        {
            for (name, value) in deps {
                dependencies.push(parse_poetry_dependency(name, value));
            }
        }

        if let Some(groups) = poetry
            .and_then(|p| p.get("group"))
            .and_then(|g| g.as_table())
        {
            for group in groups.values() {
                if let Some(deps) = group.get("dependencies").and_then(|d| d.as_table()) {
                    for (name, value) in deps {
                        dependencies.push(parse_poetry_dependency(name, value));
                    }
                }
            }
        }

        let project = document.get("project");

        if let Some(deps) = project
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array())
        {
            dependencies.extend(
                deps.iter()
                    .filter_map(|d| d.as_str())
                    .filter_map(parse_requirement),
            );
        }

        if let Some(optional) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|d| d.as_table())
        {
            for deps in optional.values().filter_map(|d| d.as_array()) {
                dependencies.extend(
                    deps.iter()
                        .filter_map(|d| d.as_str())
                        .filter_map(parse_requirement),
                );
            }
        }

        if let Some(groups) = document.get("dependency-groups").and_then(|g| g.as_table()) {
            for deps in groups.values().filter_map(|d| d.as_array()) {
                // `{ include-group = "..." }` entries reference another group listed here
                dependencies.extend(
                    deps.iter()
                        .filter_map(|d| d.as_str())
                        .filter_map(parse_requirement),
                );
            }
        }

        if let Some(deps) = document
            .get("tool")
            .and_then(|t| t.get("uv"))
            .and_then(|u| u.get("dev-dependencies"))
            .and_then(|d| d.as_array())
        {
            dependencies.extend(
                deps.iter()
                    .filter_map(|d| d.as_str())
                    .filter_map(parse_requirement),
            );
        }

        let mut seen = HashSet::new();
        dependencies.retain(|dep| {
            let key = normalize_name(&dep.name);
            key != "python" && seen.insert(key)
        });

        Ok(dependencies)
    }
}

fn parse_requirement(dep_str: &str) -> Option<DeclaredDependency> {
    let parsed = parse_pep508(dep_str);
    if parsed.is_none() {
        tracing::warn!(requirement = dep_str, "ignoring unparseable requirement");
    }
    parsed
}

fn parse_pep508(dep_str: &str) -> Option<DeclaredDependency> {
    let caps = PEP508_RE.captures(dep_str.trim())?;
    let name = caps.get(1)?.as_str();
    let mut version_part = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();

    // Strip extras like package[extra]>=1.0
    if version_part.starts_with('[') {
        if let Some(idx) = version_part.find(']') {
            version_part = version_part[idx + 1..].trim();
        }
    }

    // Remove environment markers (after ;)
    let version_part = version_part
        .split(';')
        .next()
        .unwrap_or(version_part)
        .trim();

    // Direct references (name @ url) carry no version constraint
    let constraint = if version_part.is_empty() || version_part.starts_with('@') {
        None
    } else {
        Some(Constraint::new(version_part))
    };

    Some(DeclaredDependency::new(name, constraint))
}

fn parse_poetry_dependency(name: &str, value: &Value) -> DeclaredDependency {
    let constraint = match value {
        Value::String(s) => Some(Constraint::new(s.as_str())),
        Value::Table(t) => t
            .get("version")
            .and_then(|v| v.as_str())
            .map(Constraint::new),
        // Multiple-constraint arrays: take the first entry that names a version
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("version").and_then(|v| v.as_str()))
            .next()
            .map(Constraint::new),
        _ => None,
    };

    if constraint.is_none() {
        tracing::debug!(dependency = name, "no version constraint declared");
    }

    DeclaredDependency::new(name, constraint)
}
