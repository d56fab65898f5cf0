//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (default 3 retries), one budget per request
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("lockfresh/", env!("CARGO_PKG_VERSION"));

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RegistryError::NetworkError {
                package: String::new(),
                registry: "HTTP client".to_string(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new HTTP client with a custom timeout and the default User-Agent
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic and error context
    ///
    /// Network errors, timeouts and 429 responses are retried with exponential
    /// backoff. 404 and other HTTP errors are returned immediately.
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        self.with_retries(package, move || self.send_once(url, package, registry))
            .await
    }

    /// Perform a GET request and parse the JSON response
    ///
    /// An unparseable body counts as one failed attempt of the same retry
    /// budget as network errors.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        self.with_retries(package, move || async move {
            let response = match self.send_once(url, package, registry).await? {
                Attempt::Done(response) => response,
                Attempt::Retry(error) => return Ok(Attempt::Retry(error)),
            };

            match response.json::<T>().await {
                Ok(parsed) => Ok(Attempt::Done(parsed)),
                Err(e) => Ok(Attempt::Retry(RegistryError::InvalidResponse {
                    package: package.to_string(),
                    registry: registry.to_string(),
                    message: format!("failed to parse JSON: {}", e),
                })),
            }
        })
        .await
    }

    /// Send one request and classify the response
    async fn send_once(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<Attempt<reqwest::Response>, RegistryError> {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Ok(Attempt::Retry(RegistryError::rate_limit_exceeded(registry)));
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(RegistryError::package_not_found(package, registry));
                }
                if !status.is_success() {
                    return Err(RegistryError::network_error(
                        package,
                        registry,
                        format!("HTTP {}", status),
                    ));
                }
                Ok(Attempt::Done(response))
            }
            Err(e) if e.is_timeout() => {
                Ok(Attempt::Retry(RegistryError::timeout(package, registry)))
            }
            Err(e) => Ok(Attempt::Retry(RegistryError::network_error(
                package,
                registry,
                e.to_string(),
            ))),
        }
    }

    /// Run `attempt` until it succeeds, fails for good, or the retries run out
    async fn with_retries<T, F, Fut>(
        &self,
        package: &str,
        mut attempt: F,
    ) -> Result<T, RegistryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Attempt<T>, RegistryError>>,
    {
        let mut delay = BASE_DELAY_MS;
        let mut retries = 0;

        loop {
            match attempt().await? {
                Attempt::Done(value) => return Ok(value),
                Attempt::Retry(error) if retries < self.max_retries => {
                    tracing::debug!(package, retries, %error, "request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    delay *= 2;
                    retries += 1;
                }
                Attempt::Retry(error) => return Err(error),
            }
        }
    }
}

/// Outcome of a single request attempt
enum Attempt<T> {
    /// The attempt produced a value
    Done(T),
    /// The attempt failed in a way worth retrying
    Retry(RegistryError),
}
