//! Photo download loop
//!
//! Walks observations in order and writes up to `max_photos_per_obs` photos for each.
//! Every photo yields a [`PhotoOutcome`]; a failed photo is logged and the loop moves
//! on to the next photo and the next observation. Photo downloads are not rate limited.

use indicatif::ProgressBar;
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::config::{ORIGINAL_MARKER, THUMBNAIL_MARKER};
use super::DownloadError;
use crate::output::{photo_extension, PhotoPathBuilder};
use crate::{Observation, Photo};

/// Full-resolution URL for a thumbnail URL
///
/// Every "square" becomes "original". A URL without "square" is returned unchanged,
/// in which case the thumbnail itself is downloaded.
pub fn original_url(url: &str) -> String {
    url.replace(THUMBNAIL_MARKER, ORIGINAL_MARKER)
}

/// Result of downloading a single photo
#[derive(Debug)]
pub enum PhotoOutcome {
    /// Photo written to disk
    Saved {
        /// Destination file
        path: PathBuf,
        /// Bytes written
        bytes: usize,
    },
    /// Photo skipped after a failure
    Failed {
        /// URL that was attempted (after rewriting), if the descriptor had one
        url: Option<String>,
        /// What went wrong
        error: DownloadError,
    },
}

impl PhotoOutcome {
    /// Whether the photo was written
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Counters for one download run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Observations that had at least one photo
    pub observations_processed: usize,
    /// Observations skipped for having no photos
    pub observations_skipped: usize,
    /// Observations whose folder could not be named or created
    pub observations_failed: usize,
    /// Photos written
    pub photos_saved: usize,
    /// Photos that failed
    pub photos_failed: usize,
}

impl DownloadSummary {
    fn record(&mut self, outcome: &PhotoOutcome) {
        if outcome.is_saved() {
            self.photos_saved += 1;
        } else {
            self.photos_failed += 1;
        }
    }
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} photos saved, {} failed across {} observations ({} without photos, {} unwritable)",
            self.photos_saved,
            self.photos_failed,
            self.observations_processed,
            self.observations_skipped,
            self.observations_failed
        )
    }
}

/// Sequential photo downloader
pub struct PhotoDownloader {
    client: Client,
    progress: ProgressBar,
}

impl PhotoDownloader {
    /// Create a downloader with no visible progress
    pub fn new(client: Client) -> Self {
        Self {
            client,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance `progress` once per observation
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Download photos for every observation
    ///
    /// # Arguments
    /// * `observations` - Records in the order they should be processed
    /// * `species_name` - Species used for the species folder name
    /// * `target_folder` - Root folder for all downloads
    /// * `max_photos_per_obs` - Photos kept per observation, from the front of the list
    ///
    /// Individual failures are counted in the returned summary, never propagated.
    pub async fn download_photos(
        &self,
        observations: &[Observation],
        species_name: &str,
        target_folder: &Path,
        max_photos_per_obs: usize,
    ) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        let paths = match PhotoPathBuilder::new(target_folder, species_name) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Cannot build species folder for {:?}: {}", species_name, e);
                summary.observations_failed = observations.len();
                return summary;
            }
        };

        self.progress.set_length(observations.len() as u64);

        for obs in observations {
            self.progress.inc(1);

            if !obs.has_photos() {
                debug!("Observation {} has no photos, skipping", obs.id);
                summary.observations_skipped += 1;
                continue;
            }

            let folder = match paths.observation_dir(&obs.id) {
                Ok(folder) => folder,
                Err(e) => {
                    warn!("Cannot name folder for observation {}: {}", obs.id, e);
                    summary.observations_failed += 1;
                    continue;
                }
            };
            if let Err(e) = tokio::fs::create_dir_all(&folder).await {
                warn!("Failed to create folder {}: {}", folder.display(), e);
                summary.observations_failed += 1;
                continue;
            }
            summary.observations_processed += 1;

            for outcome in self
                .download_observation(obs, &folder, max_photos_per_obs)
                .await
            {
                summary.record(&outcome);
            }
        }

        self.progress.finish();
        info!("Download finished: {}", summary);
        summary
    }

    /// Download the first `max_photos` photos of one observation into `folder`
    pub async fn download_observation(
        &self,
        obs: &Observation,
        folder: &Path,
        max_photos: usize,
    ) -> Vec<PhotoOutcome> {
        let mut outcomes = Vec::new();

        for (idx, photo) in obs.photos().iter().take(max_photos).enumerate() {
            let outcome = self.download_photo(photo, folder, idx + 1).await;
            if let PhotoOutcome::Failed { url, error } = &outcome {
                warn!(
                    "Failed to download {}: {}",
                    url.as_deref().unwrap_or("<missing url>"),
                    error
                );
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn download_photo(&self, photo: &Photo, folder: &Path, index: usize) -> PhotoOutcome {
        let Some(thumbnail_url) = photo.url.as_deref() else {
            return PhotoOutcome::Failed {
                url: None,
                error: DownloadError::MissingUrl,
            };
        };

        let url = original_url(thumbnail_url);
        let path = PhotoPathBuilder::photo_file(folder, index, &photo_extension(&url));

        match self.fetch_and_write(&url, &path).await {
            Ok(bytes) => {
                debug!("Saved {} ({} bytes)", path.display(), bytes);
                PhotoOutcome::Saved { path, bytes }
            }
            Err(error) => PhotoOutcome::Failed {
                url: Some(url),
                error,
            },
        }
    }

    async fn fetch_and_write(&self, url: &str, path: &Path) -> Result<usize, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpError(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        tokio::fs::write(path, &body)
            .await
            .map_err(|e| DownloadError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(body.len())
    }
}
