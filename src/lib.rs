//! # Observation Photo Downloader Library
//!
//! Fetches research-grade observation records for a species from an observation
//! search API and downloads the photos attached to each observation.
//!
//! ## Features
//!
//! - **Paginated Search**: Walks the search endpoint page by page until the quota is met
//!   or the API runs out of records
//! - **Rate Limiting**: At most 60 API calls in any rolling 60-second window
//! - **Fault Isolation**: A failed photo never aborts the rest of the run
//! - **Deterministic Layout**: `<base>/<species>/observation_<id>/photo_<n>.<ext>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use observation_photo_downloader::downloader::{PhotoDownloader, RateLimiter};
//! use observation_photo_downloader::fetcher::{ApiHttpClient, ObservationApi, PaginationHelper};
//! use indicatif::ProgressBar;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let http = ApiHttpClient::new(client.clone(), RateLimiter::default());
//! let api = ObservationApi::new(http, "https://api.inaturalist.org/v1/observations");
//!
//! let observations =
//!     PaginationHelper::search_results(&api, "Danaus plexippus", 400, &ProgressBar::hidden())
//!         .await;
//!
//! let downloader = PhotoDownloader::new(client);
//! let summary = downloader
//!     .download_photos(&observations, "Danaus plexippus", Path::new("downloads"), 5)
//!     .await;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Run configuration loaded from a JSON document
//! - [`fetcher`] - Rate-limited HTTP client and the observation paginator
//! - [`downloader`] - Rate limiter and the photo download loop
//! - [`output`] - On-disk path layout and name sanitization
//! - [`cli`] - Entry point wiring and error aggregation

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// CLI wiring
pub mod cli;

/// Run configuration
pub mod config;

/// Photo download orchestration and rate limiting
pub mod downloader;

/// Observation fetchers
pub mod fetcher;

/// On-disk output layout
pub mod output;

pub use config::SearchConfig;

/// Observation identifier as returned by the API.
///
/// The search API uses numeric ids. Any other JSON value is still accepted so one
/// odd record never makes the rest of its page unreadable; whether it can name a
/// folder is decided later, per observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationId {
    /// Non-negative integer id
    Number(u64),
    /// String id
    Text(String),
    /// Any other JSON value (floats, negatives, booleans, `null`, containers)
    Other(serde_json::Value),
}

impl ObservationId {
    /// Text used for the observation folder name
    ///
    /// Scalars are formatted as they appear in the JSON document. `null`, arrays
    /// and objects have no folder name.
    pub fn folder_name(&self) -> Option<String> {
        match self {
            Self::Number(id) => Some(id.to_string()),
            Self::Text(id) => Some(id.clone()),
            Self::Other(value) => match value {
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                serde_json::Value::String(s) => Some(s.clone()),
                _ => None,
            },
        }
    }
}

impl Default for ObservationId {
    fn default() -> Self {
        Self::Other(serde_json::Value::Null)
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<u64> for ObservationId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

/// A single observation record.
///
/// Only `id` and `photos` are interpreted; every other field is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier, used for folder naming (`null` when absent)
    #[serde(default)]
    pub id: ObservationId,
    /// Photo descriptors in API order (absent and `null` both mean none)
    #[serde(default)]
    pub photos: Option<Vec<Photo>>,
    /// Uninterpreted fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Observation {
    /// Create an observation with the given photo URLs and no extra fields
    pub fn new(id: u64, photo_urls: &[&str]) -> Self {
        Self {
            id: ObservationId::Number(id),
            photos: Some(photo_urls.iter().map(|url| Photo::new(*url)).collect()),
            extra: serde_json::Map::new(),
        }
    }

    /// Photo descriptors, empty when the record carries none
    pub fn photos(&self) -> &[Photo] {
        self.photos.as_deref().unwrap_or_default()
    }

    /// Whether the record has at least one photo descriptor
    pub fn has_photos(&self) -> bool {
        !self.photos().is_empty()
    }
}

/// A photo descriptor attached to an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// URL of the "square" rendition
    #[serde(default)]
    pub url: Option<String>,
    /// Uninterpreted fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Photo {
    /// Create a descriptor pointing at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            extra: serde_json::Map::new(),
        }
    }
}
