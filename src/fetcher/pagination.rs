//! Page walking for the observation search endpoint
//!
//! Requests pages 1, 2, 3, ... and stops on the first of:
//! - the quota is already met (results are truncated to the quota)
//! - a page request fails (whatever was collected so far is returned)
//! - a page comes back empty
//! - a page comes back shorter than [`PER_PAGE`] (that page is still kept)

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::downloader::config::{PER_PAGE, SEARCH_PARAMS};
use crate::fetcher::ObservationSource;
use crate::Observation;

/// Outcome of one pagination step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDecision {
    /// Full page; request the next one
    Continue,
    /// Accumulated records already cover the quota
    QuotaReached,
    /// The page request failed
    FetchFailed,
    /// The page had no records; nothing appended
    EmptyPage,
    /// The page had fewer than [`PER_PAGE`] records; appended, then stop
    ShortPage,
}

impl PageDecision {
    /// Classify a successfully fetched page by its length
    pub fn for_page(page_len: usize) -> Self {
        if page_len == 0 {
            Self::EmptyPage
        } else if page_len < PER_PAGE {
            Self::ShortPage
        } else {
            Self::Continue
        }
    }

    /// Whether pagination ends after this step
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Result of a full pagination run
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Collected observations, at most the requested maximum
    pub observations: Vec<Observation>,
    /// Number of page requests issued (failed ones included)
    pub pages_requested: usize,
    /// Why pagination stopped
    pub stopped_by: PageDecision,
}

/// Pagination helper for the observation search endpoint
pub struct PaginationHelper;

impl PaginationHelper {
    /// Query parameters for one page of a species search
    pub fn search_params(species_name: &str, page: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", species_name.to_string())];
        params.extend(
            SEARCH_PARAMS
                .iter()
                .map(|(key, value)| (*key, (*value).to_string())),
        );
        params.push(("page", page.to_string()));
        params
    }

    /// Fetch up to `max_results` observations for `species_name`
    ///
    /// Never fails: a fetch error ends pagination and the partial result is returned.
    pub async fn search_results<S>(
        source: &S,
        species_name: &str,
        max_results: usize,
        progress: &ProgressBar,
    ) -> Vec<Observation>
    where
        S: ObservationSource + ?Sized,
    {
        Self::paginate(source, species_name, max_results, progress)
            .await
            .observations
    }

    /// Walk pages until a terminal [`PageDecision`], reporting how the run ended
    pub async fn paginate<S>(
        source: &S,
        species_name: &str,
        max_results: usize,
        progress: &ProgressBar,
    ) -> SearchOutcome
    where
        S: ObservationSource + ?Sized,
    {
        let mut results: Vec<Observation> = Vec::new();
        let mut page = 1;
        let mut pages_requested = 0;

        let stopped_by = loop {
            if results.len() >= max_results {
                break PageDecision::QuotaReached;
            }

            let params = Self::search_params(species_name, page);
            debug!("Fetching observations page {} for {:?}", page, species_name);
            pages_requested += 1;

            let data = match source.fetch_page(&params).await {
                Ok(data) => data,
                Err(e) => {
                    warn!(
                        "Request to {} failed: {}. Stopping at page {} with {} observations",
                        source.api_url(),
                        e,
                        page,
                        results.len()
                    );
                    break PageDecision::FetchFailed;
                }
            };

            let decision = PageDecision::for_page(data.len());
            if decision == PageDecision::EmptyPage {
                debug!("Empty page {} received, no more observations", page);
                break decision;
            }

            debug!("Received {} observations in page {}", data.len(), page);
            progress.inc(data.len() as u64);
            results.extend(data);
            page += 1;

            if decision.is_terminal() {
                debug!("Short page received, no more observations");
                break decision;
            }
        };

        results.truncate(max_results);

        info!(
            "Fetched {} observations for {:?} in {} page requests ({:?})",
            results.len(),
            species_name,
            pages_requested,
            stopped_by
        );

        SearchOutcome {
            observations: results,
            pages_requested,
            stopped_by,
        }
    }
}
