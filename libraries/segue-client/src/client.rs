//! Shared HTTP plumbing for the Segue clients.

use crate::error::{ClientError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default per-request budget.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the service (e.g., "http://api:8000/api/v1")
    pub url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Create a new service config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Validate the base URL and build an HTTP client honouring the timeout.
///
/// Returns the client together with the normalized base URL (no trailing slash).
pub(crate) fn build(config: &ServiceConfig) -> Result<(Client, String)> {
    if config.url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = config.url.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

    let http = Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout.min(Duration::from_secs(5)))
        .user_agent(format!("Segue/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Request)?;

    Ok((http, url))
}
