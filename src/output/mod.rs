//! On-disk output layout

pub mod path;

pub use path::{photo_extension, safe_component, PhotoPathBuilder};

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Name that cannot be turned into a path component
    #[error("invalid path component: {0:?}")]
    InvalidComponent(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
