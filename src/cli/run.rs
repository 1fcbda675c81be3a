//! Run command: search observations, then download their photos

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::CliError;
use crate::config::{SearchConfig, DEFAULT_CONFIG_PATH};
use crate::downloader::{DownloadSummary, PhotoDownloader, RateLimiter};
use crate::fetcher::http::build_http_client;
use crate::fetcher::{ApiHttpClient, ObservationApi, PaginationHelper};
use crate::output::PhotoPathBuilder;

/// Observation Photo Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "observation-photo-downloader")]
#[command(about = "Download research-grade observation photos for a species", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path of the JSON configuration document
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

impl Cli {
    /// Load the configuration and run the search and download
    ///
    /// Configuration problems fail before any network activity. After that the run
    /// only fails if the HTTP client cannot be built; fetch and photo errors are
    /// absorbed and show up in the returned summary.
    pub async fn execute(&self) -> Result<DownloadSummary, CliError> {
        let config = SearchConfig::load(&self.config)?;
        run(&config).await
    }
}

/// Run one search-and-download pass for `config`
pub async fn run(config: &SearchConfig) -> Result<DownloadSummary, CliError> {
    config.validate()?;
    // Reject unusable species names before touching the network
    PhotoPathBuilder::new(&config.base_folder, &config.species_name)?;

    info!(
        "Searching up to {} observations of {:?} at {}",
        config.max_observations, config.species_name, config.api_url
    );

    let client = build_http_client().map_err(|e| CliError::ClientError(e.to_string()))?;
    let api = ObservationApi::new(
        ApiHttpClient::new(client.clone(), RateLimiter::default()),
        config.api_url.clone(),
    );

    let fetch_progress = spinner("Fetching observations");
    let observations = PaginationHelper::search_results(
        &api,
        &config.species_name,
        config.max_observations,
        &fetch_progress,
    )
    .await;
    fetch_progress.finish_with_message(format!("Fetched {} observations", observations.len()));

    let downloader = PhotoDownloader::new(client)
        .with_progress(progress_bar(observations.len() as u64, "Downloading photos"));
    let summary = downloader
        .download_photos(
            &observations,
            &config.species_name,
            &config.base_folder,
            config.max_photos_per_observation,
        )
        .await;

    Ok(summary)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}: {pos}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message);
    pb
}
