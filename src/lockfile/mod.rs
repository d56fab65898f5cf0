//! Lockfile detection and parsing
//!
//! This module provides functionality to:
//! - Locate the lockfile of a project directory
//! - Read the resolved packages from poetry.lock or uv.lock

mod parser;

pub use parser::parse_lockfile;

use crate::domain::DependencySpec;
use crate::error::LockfileError;
use std::path::{Path, PathBuf};

/// Lockfile names looked up in a project directory, in priority order
pub const LOCKFILE_NAMES: &[&str] = &["poetry.lock", "uv.lock"];

/// Find the lockfile of a project directory
pub fn detect_lockfile(dir: &Path) -> Result<PathBuf, LockfileError> {
    LOCKFILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| LockfileError::NotFound {
            dir: dir.to_path_buf(),
            candidates: LOCKFILE_NAMES.join(", "),
        })
}

/// Read and parse the locked dependencies from a lockfile path
pub fn read_lockfile(path: &Path) -> Result<Vec<DependencySpec>, LockfileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| LockfileError::read_error(path, e))?;
    parse_lockfile(&content, path)
}
