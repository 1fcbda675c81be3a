//! Path generation for downloaded photos
//!
//! Photos land in a three-level structure:
//! `{base_folder}/{species}/observation_{id}/photo_{n}.{ext}`
//!
//! # Usage Example
//!
//! ```rust
//! use observation_photo_downloader::output::PhotoPathBuilder;
//! use observation_photo_downloader::ObservationId;
//! use std::path::{Path, PathBuf};
//!
//! let builder = PhotoPathBuilder::new("downloads", "Danaus plexippus").unwrap();
//! let folder = builder.observation_dir(&ObservationId::Number(12345)).unwrap();
//! assert_eq!(
//!     folder,
//!     PathBuf::from("downloads/Danaus_plexippus/observation_12345")
//! );
//! assert_eq!(
//!     PhotoPathBuilder::photo_file(&folder, 1, "jpg"),
//!     Path::new("downloads/Danaus_plexippus/observation_12345/photo_1.jpg")
//! );
//! ```

use super::{OutputError, OutputResult};
use crate::downloader::config::FALLBACK_EXTENSION;
use crate::ObservationId;
use std::path::{Path, PathBuf};

const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turn an arbitrary name into exactly one normal path component
///
/// Spaces, path separators, characters reserved on common filesystems and control
/// characters become `_`. A name made only of dots (`.`, `..`) is replaced by
/// underscores so it can never walk out of its parent directory.
///
/// The mapping is not injective: `"a/b"`, `"a b"` and `"a_b"` all become `a_b`, so
/// distinct ids that differ only in replaced characters share a folder and their
/// photos overwrite each other.
///
/// # Errors
/// Returns [`OutputError::InvalidComponent`] when the trimmed name is empty.
pub fn safe_component(name: &str) -> OutputResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OutputError::InvalidComponent(name.to_string()));
    }

    let mut safe: String = trimmed
        .chars()
        .map(|c| {
            if c == ' ' || c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    if safe.chars().all(|c| c == '.') {
        safe = "_".repeat(safe.len());
    }

    Ok(safe)
}

/// File extension of a photo URL
///
/// Taken from the last path segment after dropping any query string or fragment,
/// e.g. `.../original.jpg?size=200` gives `jpg`. Falls back to
/// [`FALLBACK_EXTENSION`] when the segment has no usable extension.
pub fn photo_extension(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let segment = without_query.rsplit('/').next().unwrap_or_default();

    match segment.rsplit_once('.') {
        Some((_, ext)) if is_usable_extension(ext) => ext.to_string(),
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

fn is_usable_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Path builder for one species' download tree
#[derive(Debug, Clone)]
pub struct PhotoPathBuilder {
    species_dir: PathBuf,
}

impl PhotoPathBuilder {
    /// Create a builder rooted at `base_folder` for `species_name`
    ///
    /// # Errors
    /// Returns [`OutputError::InvalidComponent`] for an empty species name.
    pub fn new(base_folder: impl AsRef<Path>, species_name: &str) -> OutputResult<Self> {
        let species = safe_component(species_name)?;
        Ok(Self {
            species_dir: base_folder.as_ref().join(species),
        })
    }

    /// `{base_folder}/{species}`
    pub fn species_dir(&self) -> &Path {
        &self.species_dir
    }

    /// `{base_folder}/{species}/observation_{id}`
    ///
    /// The id goes through [`safe_component`], so ids that sanitize to the same
    /// text share a folder.
    ///
    /// # Errors
    /// Returns [`OutputError::InvalidComponent`] for an id with no folder name
    /// (`null`, arrays, objects, blank strings).
    pub fn observation_dir(&self, id: &ObservationId) -> OutputResult<PathBuf> {
        let name = id
            .folder_name()
            .ok_or_else(|| OutputError::InvalidComponent(id.to_string()))?;
        let name = safe_component(&name)?;
        Ok(self.species_dir.join(format!("observation_{name}")))
    }

    /// `{folder}/photo_{index}.{extension}`, with `index` 1-based
    pub fn photo_file(folder: &Path, index: usize, extension: &str) -> PathBuf {
        folder.join(format!("photo_{index}.{extension}"))
    }
}
