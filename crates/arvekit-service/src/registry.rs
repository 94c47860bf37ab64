//! Estonian business registry (Äriregister) autocomplete client.
//!
//! The service proxies company-name autocomplete so the browser never talks
//! to the registry directly. The upstream payload is forwarded as-is; the
//! handler degrades to an empty result list when the registry is down.

use reqwest::Client;
use std::time::Duration;

/// Timeout for registry requests. Autocomplete is interactive; fail fast.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry returned a non-success status.
    #[error("registry API error: status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },
}

/// Business registry API client.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a new registry client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Query the autocomplete endpoint and forward the raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` when the request fails or the registry
    /// responds with a non-success status.
    pub async fn autocomplete(&self, query: &str) -> Result<serde_json::Value, RegistryError> {
        let url = format!("{}/autocomplete", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
