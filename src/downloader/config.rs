//! Download configuration constants

use std::time::Duration;

/// Number of observation records requested per API page.
/// 200 is the largest page the search endpoint serves.
pub const PER_PAGE: usize = 200;

/// Maximum number of API calls in one rate limit window.
pub const RATE_LIMIT_CALLS: usize = 60;

/// Length of the rolling rate limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// HTTP connect timeout (seconds) - time to establish TCP connection
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout (seconds) - overall time for one request, photo bodies included
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default number of photos kept per observation.
pub const DEFAULT_MAX_PHOTOS_PER_OBSERVATION: usize = 5;

/// Default root folder for downloaded photos.
pub const DEFAULT_BASE_FOLDER: &str = "downloads";

/// Extension used when a photo URL carries none.
pub const FALLBACK_EXTENSION: &str = "jpg";

/// Substring identifying the thumbnail rendition in a photo URL
pub const THUMBNAIL_MARKER: &str = "square";

/// Replacement for [`THUMBNAIL_MARKER`] selecting the full-resolution rendition
pub const ORIGINAL_MARKER: &str = "original";

/// Fixed search parameters sent with every page request (besides `q` and `page`).
pub const SEARCH_PARAMS: [(&str, &str); 4] = [
    ("order_by", "created_at"),
    ("photos", "true"),
    ("quality_grade", "research"),
    ("per_page", "200"),
];
