//! Observation fetchers
//!
//! - [`http`] - Rate-limited JSON client for the search API
//! - [`observations`] - [`ObservationSource`] backed by the search endpoint
//! - [`pagination`] - Page walking with the end-of-data policy

use crate::Observation;
use async_trait::async_trait;

pub mod http;
pub mod observations;
pub mod pagination;

pub use http::{build_http_client, ApiHttpClient};
pub use observations::ObservationApi;
pub use pagination::{PageDecision, PaginationHelper, SearchOutcome};

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response parse error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Request could not complete
    #[error("network error: {0}")]
    NetworkError(String),

    /// Rate limiter refused the call
    #[error("rate limiter error: {0}")]
    RateLimitError(#[from] crate::downloader::RateLimitError),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// Source of observation search pages
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fetch one page of observations
    ///
    /// # Arguments
    /// * `params` - Query parameters for this page (including `page`)
    ///
    /// # Returns
    /// The page's `results`, in API order
    async fn fetch_page(&self, params: &[(&str, String)]) -> FetcherResult<Vec<Observation>>;

    /// URL of the search endpoint, for diagnostics
    fn api_url(&self) -> &str;
}
