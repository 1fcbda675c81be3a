//! Run configuration
//!
//! Loaded from a JSON document such as:
//!
//! ```json
//! {
//!   "species_name": "Danaus plexippus",
//!   "max_observations": 500,
//!   "max_photos_per_observation": 5,
//!   "base_folder": "downloads",
//!   "api_url": "https://api.inaturalist.org/v1/observations"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::downloader::config::{DEFAULT_BASE_FOLDER, DEFAULT_MAX_PHOTOS_PER_OBSERVATION};

/// Default location of the configuration document
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {message}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// Config file is not valid JSON for [`SearchConfig`]
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// Species name missing or blank
    #[error("Species name must be provided in the configuration")]
    MissingSpecies,

    /// API URL blank
    #[error("api_url must not be empty")]
    MissingApiUrl,
}

/// Settings for one download run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Free-text species query; also names the species folder
    #[serde(default)]
    pub species_name: String,
    /// Maximum observation records to fetch
    pub max_observations: usize,
    /// Maximum photos downloaded per observation
    #[serde(default = "default_max_photos")]
    pub max_photos_per_observation: usize,
    /// Root folder for downloads
    #[serde(default = "default_base_folder")]
    pub base_folder: PathBuf,
    /// Observation search endpoint
    pub api_url: String,
}

fn default_max_photos() -> usize {
    DEFAULT_MAX_PHOTOS_PER_OBSERVATION
}

fn default_base_folder() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_FOLDER)
}

impl SearchConfig {
    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.species_name = config.species_name.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Check the fields a run cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.species_name.trim().is_empty() {
            return Err(ConfigError::MissingSpecies);
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingApiUrl);
        }
        Ok(())
    }
}
