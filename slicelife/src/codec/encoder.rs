//! Canvas encoding and persistence.
//!
//! The finished canvas is encoded fully in memory first and only then written
//! out, through a temporary file that is renamed into place. A failed encode
//! never touches the destination and a failed write never leaves a partial
//! file under the final name.

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageError, RgbImage, RgbaImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Default JPEG quality for the final image.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Errors from encoding or persisting the canvas.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The codec rejected the canvas
    #[error("failed to encode canvas: {0}")]
    Encode(#[from] ImageError),

    /// The encoded bytes could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Strategy for turning the finished canvas into file bytes.
pub trait CanvasEncoder: Send + Sync {
    /// Encode the canvas to a complete file image.
    fn encode(&self, canvas: &RgbaImage) -> Result<Vec<u8>, EncodeError>;

    /// File extension without the leading dot.
    fn extension(&self) -> &str;

    /// Human-readable encoder name for logs.
    fn name(&self) -> &str;

    /// Encode the canvas and write it to `path`.
    ///
    /// Returns the number of bytes written.
    fn save(&self, canvas: &RgbaImage, path: &Path) -> Result<usize, EncodeError> {
        let bytes = self.encode(canvas)?;
        write_atomic(path, &bytes)?;
        Ok(bytes.len())
    }
}

impl<T: CanvasEncoder + ?Sized> CanvasEncoder for Arc<T> {
    fn encode(&self, canvas: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(canvas)
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Lossy JPEG encoder with a configurable quality.
///
/// Alpha is dropped; fully transparent regions (slices that failed to load)
/// come out black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegCanvasEncoder {
    quality: u8,
}

impl JpegCanvasEncoder {
    /// Create an encoder; `quality` is clamped to `1..=100`.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Configured quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegCanvasEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl CanvasEncoder for JpegCanvasEncoder {
    fn encode(&self, canvas: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        let rgb: RgbImage = canvas.convert();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality).encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(bytes)
    }

    fn extension(&self) -> &str {
        "jpeg"
    }

    fn name(&self) -> &str {
        "JPEG"
    }
}

/// Write `bytes` to `path` via a sibling temporary file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let write_err = |source| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        write_err(e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
