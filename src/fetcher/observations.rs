//! Observation search endpoint

use async_trait::async_trait;
use serde::Deserialize;

use super::http::ApiHttpClient;
use super::{FetcherResult, ObservationSource};
use crate::Observation;

/// Body of one search response. Only the presence of `results` is checked;
/// records with odd ids are kept and handled per observation by the downloader.
#[derive(Debug, Deserialize)]
struct SearchPage {
    results: Vec<Observation>,
}

/// [`ObservationSource`] backed by the HTTP search endpoint
pub struct ObservationApi {
    http: ApiHttpClient,
    api_url: String,
}

impl ObservationApi {
    /// Create a source for the search endpoint at `api_url`
    pub fn new(http: ApiHttpClient, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl ObservationSource for ObservationApi {
    async fn fetch_page(&self, params: &[(&str, String)]) -> FetcherResult<Vec<Observation>> {
        let page: SearchPage = self.http.get(&self.api_url, params).await?;
        Ok(page.results)
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }
}
