//! Manifest detection and dependency scoping
//!
//! This module provides functionality to:
//! - Detect pyproject.toml next to the lockfile
//! - Parse the direct dependencies it declares
//! - Narrow the locked packages down to those direct dependencies
//! - Attach declared constraints to locked packages

mod pyproject_toml;

pub use pyproject_toml::{DeclaredDependency, PyprojectTomlParser};

use crate::domain::{normalize_name, DependencySpec};
use crate::error::{LockfileError, ManifestError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Manifest filename looked up in a project directory
pub const MANIFEST_NAME: &str = "pyproject.toml";

/// Find the manifest of a project directory, if there is one
pub fn detect_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// Read and parse the declared dependencies from a manifest path
pub fn read_manifest(path: &Path) -> Result<Vec<DeclaredDependency>, ManifestError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    PyprojectTomlParser.parse(&content, path)
}

/// Keep only the locked packages that the manifest declares
///
/// Lockfile order is preserved and each kept package carries its declared
/// constraint. A declared dependency without a lockfile entry means the
/// lockfile is out of sync with the manifest.
pub fn scope_to_declared(
    locked: Vec<DependencySpec>,
    declared: &[DeclaredDependency],
    lockfile: &Path,
) -> Result<Vec<DependencySpec>, LockfileError> {
    let mut wanted: HashMap<String, &DeclaredDependency> = declared
        .iter()
        .map(|d| (normalize_name(&d.name), d))
        .collect();

    let mut scoped = Vec::with_capacity(wanted.len());
    for dep in locked {
        if let Some(declaration) = wanted.remove(&dep.normalized_name()) {
            scoped.push(match &declaration.constraint {
                Some(constraint) => dep.with_constraint(constraint.clone()),
                None => dep,
            });
        }
    }

    // Report the first missing dependency in manifest order
    if let Some(missing) = declared
        .iter()
        .find(|d| wanted.contains_key(&normalize_name(&d.name)))
    {
        return Err(LockfileError::MissingPackage {
            path: lockfile.to_path_buf(),
            name: missing.name.clone(),
        });
    }

    Ok(scoped)
}

/// Attach declared constraints to locked packages without narrowing the scope
///
/// Used when every locked package is checked but the manifest still freezes
/// some of them.
pub fn apply_constraints(
    locked: Vec<DependencySpec>,
    declared: &[DeclaredDependency],
) -> Vec<DependencySpec> {
    let constraints: HashMap<String, &DeclaredDependency> = declared
        .iter()
        .map(|d| (normalize_name(&d.name), d))
        .collect();

    locked
        .into_iter()
        .map(|dep| {
            match constraints
                .get(&dep.normalized_name())
                .and_then(|d| d.constraint.clone())
            {
                Some(constraint) => dep.with_constraint(constraint),
                None => dep,
            }
        })
        .collect()
}
