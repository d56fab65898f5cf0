//! Application error types using thiserror
//!
//! Error hierarchy:
//! - LockfileError: Issues locating or parsing the lockfile (fatal)
//! - ManifestError: Issues with pyproject.toml parsing (fatal)
//! - RegistryError: Issues with package registry communication (per dependency)
//! - ConfigError: Issues with CLI configuration (fatal)

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Lockfile related errors
    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to lockfile operations
#[derive(Error, Debug)]
pub enum LockfileError {
    /// No lockfile could be found in the project directory
    #[error("no lockfile found in {dir} (looked for {candidates})")]
    NotFound { dir: PathBuf, candidates: String },

    /// Failed to read lockfile
    #[error("failed to read lockfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse lockfile {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// The same package is locked at more than one version
    #[error("package '{name}' is locked at multiple versions in {path}: {first}, {second}")]
    AmbiguousPackage {
        path: PathBuf,
        name: String,
        first: String,
        second: String,
    },

    /// A dependency declared in the manifest has no lockfile entry
    #[error("dependency '{name}' is declared in the manifest but missing from {path}")]
    MissingPackage { path: PathBuf, name: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid registry URL
    #[error("invalid registry URL '{value}': {message}")]
    InvalidRegistryUrl { value: String, message: String },

    /// Invalid numeric option
    #[error("invalid value for {option}: {message}")]
    InvalidValue { option: String, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl LockfileError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LockfileError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LockfileError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockfile_error_not_found() {
        let err = LockfileError::NotFound {
            dir: PathBuf::from("/project"),
            candidates: "poetry.lock, uv.lock".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("no lockfile found"));
        assert!(msg.contains("poetry.lock, uv.lock"));
    }

    #[test]
    fn test_lockfile_error_parse() {
        let err = LockfileError::parse_error("/project/poetry.lock", "expected `=`");
        let msg = err.to_string();
        assert!(msg.contains("failed to parse lockfile"));
        assert!(msg.contains("expected `=`"));
    }

    #[test]
    fn test_lockfile_error_ambiguous() {
        let err = LockfileError::AmbiguousPackage {
            path: PathBuf::from("poetry.lock"),
            name: "numpy".to_string(),
            first: "1.24.4".to_string(),
            second: "1.26.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("numpy"));
        assert!(msg.contains("1.24.4"));
        assert!(msg.contains("1.26.0"));
    }

    #[test]
    fn test_lockfile_error_missing_package() {
        let err = LockfileError::MissingPackage {
            path: PathBuf::from("poetry.lock"),
            name: "requests".to_string(),
        };
        assert!(err.to_string().contains("'requests' is declared"));
    }

    #[test]
    fn test_manifest_error_toml_parse() {
        let err = ManifestError::toml_parse_error("/path/to/pyproject.toml", "invalid key");
        let msg = err.to_string();
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = err.to_string();
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("PyPI");
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("django", "PyPI");
        let msg = err.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("django"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            option: "--jobs".to_string(),
            message: "must be at least 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("--jobs"));
        assert!(msg.contains("at least 1"));
    }

    #[test]
    fn test_app_error_from_lockfile_error() {
        let app_err: AppError = LockfileError::parse_error("poetry.lock", "bad").into();
        assert!(app_err.to_string().contains("failed to parse lockfile"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::package_not_found("pkg", "PyPI").into();
        assert!(app_err.to_string().contains("package 'pkg' not found"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::ConflictingOptions {
            message: "--json and --junit cannot be used together".to_string(),
        }
        .into();
        assert!(app_err.to_string().contains("conflicting options"));
    }
}
