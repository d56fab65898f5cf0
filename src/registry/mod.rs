//! Registry adapters for fetching the latest published version of a package
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API adapter

mod client;
mod pypi;

pub use client::{HttpClient, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use pypi::{PyPIAdapter, PYPI_API_URL};

use crate::domain::RegistryLookupResult;
use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &str;

    /// Base URL the adapter queries, shown in reports
    fn base_url(&self) -> &str;

    /// Fetch the latest published version of a package
    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError>;

    /// Look up a package, turning registry errors into a failed lookup result
    async fn lookup(&self, package: &str) -> RegistryLookupResult {
        match self.fetch_latest(package).await {
            Ok(version) => RegistryLookupResult::found(package, version),
            Err(e) => {
                tracing::warn!(package, error = %e, "registry lookup failed");
                RegistryLookupResult::failed(package, e.to_string())
            }
        }
    }
}
