//! Photo download orchestration and rate limiting
//!
//! # Components
//!
//! - [`photos`] - Sequential photo downloader with per-photo fault isolation
//! - [`rate_limit`] - Rolling-window limiter used by the API client
//! - [`config`] - Configuration constants
//!
//! # Error Handling
//!
//! Per-photo failures are reported as [`DownloadError`] inside a
//! [`photos::PhotoOutcome::Failed`] and never abort the run.

pub mod config;
pub mod photos;
pub mod rate_limit;

pub use photos::{original_url, DownloadSummary, PhotoDownloader, PhotoOutcome};
pub use rate_limit::{RateLimitError, RateLimiter};

/// Photo download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Descriptor without a `url`
    #[error("photo descriptor has no url")]
    MissingUrl,

    /// Request could not complete
    #[error("network error: {0}")]
    NetworkError(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Writing the file failed
    #[error("IO error: {0}")]
    IoError(String),
}
