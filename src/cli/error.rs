//! CLI error types and conversions

use crate::config::ConfigError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    ClientError(String),
}
