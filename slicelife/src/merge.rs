//! High-level merge facade.
//!
//! [`SliceOfLife`] wires the pieces together for the common case: list the
//! photos in a directory, compose them, name the result and encode it to disk.
//!
//! ```no_run
//! use slicelife::config::MergeConfig;
//! use slicelife::log::TracingLogger;
//! use slicelife::merge::SliceOfLife;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let merger = SliceOfLife::new(MergeConfig::default(), Arc::new(TracingLogger));
//! let outcome = merger.merge_directory(Path::new("photos/garden"))?;
//! println!("wrote {}", outcome.path.display());
//! # Ok::<(), slicelife::merge::MergeError>(())
//! ```

use crate::codec::{CanvasEncoder, EncodeError, FsImageLoader, ImageLoader, JpegCanvasEncoder};
use crate::config::MergeConfig;
use crate::log::Logger;
use crate::output::output_filename;
use crate::pipeline::{Composition, PipelineError, SlicePipeline};
use crate::source::{list_images, SourceError};
use crate::{log_debug, log_info, log_warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Result of a successful merge.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Where the merged image was written
    pub path: PathBuf,
    /// Size of the written file
    pub bytes_written: usize,
    /// Images found in the directory
    pub images: usize,
    /// The composition that was encoded
    pub composition: Composition,
}

/// Merges a directory of photos into a single image.
pub struct SliceOfLife {
    config: MergeConfig,
    loader: Arc<dyn ImageLoader>,
    encoder: Arc<dyn CanvasEncoder>,
    logger: Arc<dyn Logger>,
}

impl SliceOfLife {
    /// Create a merger that reads from the filesystem and writes JPEG at the
    /// configured quality.
    pub fn new(config: MergeConfig, logger: Arc<dyn Logger>) -> Self {
        let encoder = Arc::new(JpegCanvasEncoder::new(config.quality()));
        Self {
            config,
            loader: Arc::new(FsImageLoader::new()),
            encoder,
            logger,
        }
    }

    /// Replace the image loader.
    pub fn with_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the canvas encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn CanvasEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Compose `paths` without writing anything.
    pub fn compose(&self, paths: &[PathBuf]) -> Result<Composition, MergeError> {
        let pipeline = SlicePipeline::new(
            self.config.pipeline_config(),
            Arc::clone(&self.loader),
            Arc::clone(&self.logger),
        );
        Ok(pipeline.compose(paths)?)
    }

    /// Merge every photo in `directory` and write the result.
    ///
    /// Nothing is written unless composition succeeds.
    pub fn merge_directory(&self, directory: &Path) -> Result<MergeOutcome, MergeError> {
        let images = list_images(directory)?;
        log_info!(
            self.logger,
            "Found {} image files to merge in {}",
            images.len(),
            directory.display()
        );

        let composition = self.compose(&images)?;
        if !composition.failures.is_empty() {
            log_warn!(
                self.logger,
                "{} of {} slices could not be loaded and were left blank",
                composition.failures.len(),
                composition.emitted
            );
        }

        let path = self.output_path(directory, images.len())?;
        log_debug!(
            self.logger,
            "Encoding {} as {}",
            path.display(),
            self.encoder.name()
        );
        let bytes_written = self.encoder.save(&composition.canvas, &path)?;
        log_info!(
            self.logger,
            "Wrote {} ({} bytes)",
            path.display(),
            bytes_written
        );

        Ok(MergeOutcome {
            path,
            bytes_written,
            images: images.len(),
            composition,
        })
    }

    /// Where the merge of `directory` goes, creating the output directory.
    fn output_path(&self, directory: &Path, count: usize) -> Result<PathBuf, MergeError> {
        // Relative inputs like "." still need a real base name.
        let named = fs::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf());
        let filename = output_filename(
            self.config.prefix(),
            &named,
            count,
            self.encoder.extension(),
        );

        match self.config.output_dir() {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|source| EncodeError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
                Ok(dir.join(filename))
            }
            None => Ok(PathBuf::from(filename)),
        }
    }
}
