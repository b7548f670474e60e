//! Source image loading.
//!
//! [`ImageLoader`] is the seam between the worker pool and the image codec.
//! Workers only see the trait, so tests can feed synthetic images or inject
//! failures without touching the filesystem.

use image::{DynamicImage, ImageError, ImageReader};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Why a source image could not be loaded.
///
/// "Could not read the file" is kept apart from "read it, but could not make
/// sense of it" so the user can tell a permissions problem from a bad file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or read
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not in a format the codec understands
    #[error("unsupported image format in {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },

    /// The format was recognised but the data is damaged
    #[error("corrupt image data in {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

impl DecodeError {
    /// Path of the image that failed.
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::Unreadable { path, .. }
            | DecodeError::Unsupported { path, .. }
            | DecodeError::Corrupt { path, .. } => path,
        }
    }

    /// Classify an `image` crate error for `path`.
    pub fn from_image_error(path: &Path, err: ImageError) -> Self {
        let path = path.to_path_buf();
        match err {
            // A short read after the file opened means the data is cut off.
            ImageError::IoError(source) if source.kind() == io::ErrorKind::UnexpectedEof => {
                DecodeError::Corrupt {
                    path,
                    reason: source.to_string(),
                }
            }
            ImageError::IoError(source) => DecodeError::Unreadable { path, source },
            ImageError::Unsupported(e) => DecodeError::Unsupported {
                path,
                reason: e.to_string(),
            },
            other => DecodeError::Corrupt {
                path,
                reason: other.to_string(),
            },
        }
    }
}

/// Loads source images for the pipeline.
///
/// Implementations must be `Send + Sync`: a single loader is shared by every
/// worker thread.
pub trait ImageLoader: Send + Sync {
    /// Decode the full image at `path`.
    fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError>;
}

impl<T: ImageLoader + ?Sized> ImageLoader for Arc<T> {
    fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError> {
        (**self).decode(path)
    }
}

/// Loads images from disk with the `image` crate, guessing the format from
/// the file contents rather than the extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl FsImageLoader {
    /// Create a filesystem loader.
    pub fn new() -> Self {
        Self
    }

    fn reader(path: &Path) -> Result<ImageReader<io::BufReader<std::fs::File>>, DecodeError> {
        let unreadable = |source| DecodeError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        ImageReader::open(path)
            .map_err(unreadable)?
            .with_guessed_format()
            .map_err(unreadable)
    }
}

impl ImageLoader for FsImageLoader {
    fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError> {
        Self::reader(path)?
            .decode()
            .map_err(|e| DecodeError::from_image_error(path, e))
    }
}
