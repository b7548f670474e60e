//! Source image discovery.
//!
//! Lists the photos in a single directory (not recursive), keeping files with
//! a `.jpg`, `.jpeg` or `.png` extension in any letter case, sorted
//! lexicographically by path. Time-stamped capture names therefore come back
//! in capture order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted as source images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors from listing a source directory.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The directory (or one of its entries) could not be read
    #[error("failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether `path` has one of the accepted image extensions.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// List candidate images in `directory`, sorted.
///
/// Subdirectories are skipped, as are entries whose type cannot be
/// determined. An empty result is not an error here; the pipeline reports it.
pub fn list_images(directory: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let read_err = |source| SourceError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_file = entry.file_type().map(|t| !t.is_dir()).unwrap_or(false);
        let path = entry.path();
        if is_file && is_image_path(&path) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}
