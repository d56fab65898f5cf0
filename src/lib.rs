//! lockfresh - Lockfile freshness checker library
//!
//! This library provides the core functionality for checking that the
//! versions pinned in a Python lockfile (poetry.lock or uv.lock) are the
//! latest versions published on PyPI:
//! - Lockfile and pyproject.toml parsing
//! - Registry lookups with retries
//! - Strict version comparison with frozen-constraint handling
//! - Text, JSON and JUnit XML reports

pub mod check;
pub mod checker;
pub mod cli;
pub mod domain;
pub mod error;
pub mod lockfile;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
