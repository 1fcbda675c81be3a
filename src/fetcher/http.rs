//! Rate-limited HTTP client for the observation search API
//!
//! One GET per call, gated by the client's own [`RateLimiter`]. Failures are logged
//! with the URL and query parameters, then returned to the caller. Nothing is retried.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::downloader::config::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_REQUEST_TIMEOUT_SECS};
use crate::downloader::rate_limit::RateLimiter;
use crate::fetcher::{FetcherError, FetcherResult};

/// Build the HTTP client shared by the API client and the photo downloader
///
/// Configured with explicit timeouts so a stalled server cannot hang the run:
/// - Connect timeout: 10 seconds
/// - Request timeout: 120 seconds
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .build()
}

/// JSON client that owns the API rate limit state
pub struct ApiHttpClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl ApiHttpClient {
    /// Create new HTTP client
    ///
    /// # Arguments
    /// * `client` - Underlying HTTP client (cheap to clone, shares the connection pool)
    /// * `rate_limiter` - Limiter consulted before every request
    pub fn new(client: Client, rate_limiter: RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    /// Rate limiter gating this client
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Execute a GET request and deserialize the JSON body
    ///
    /// # Arguments
    /// * `url` - Full endpoint URL
    /// * `params` - Query parameters as key-value pairs
    ///
    /// # Errors
    /// Returns FetcherError on transport failure, non-2xx status or undecodable body
    pub async fn get<T>(&self, url: &str, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        self.rate_limiter.acquire().await?;

        debug!("Making GET request to: {} with {} params", url, params.len());

        self.request(url, params).await.inspect_err(|e| {
            error!("API request failed: {}\nURL: {}\nParams: {:?}", e, url, params);
        })
    }

    async fn request<T>(&self, url: &str, params: &[(&str, String)]) -> FetcherResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetcherError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetcherError::HttpError(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetcherError::ParseError(format!("Failed to deserialize response: {}", e)))
    }
}
