//! Runtime configuration for a merge run.

use super::settings::MergeSettings;
use crate::codec::DEFAULT_JPEG_QUALITY;
use crate::pipeline::{default_pool_size, PipelineConfig, SliceErrorPolicy};
use crate::slice::Orientation;
use std::path::{Path, PathBuf};

/// Configuration for merging one directory of photos.
///
/// Groups the slicing, encoding and output parameters, with sensible
/// defaults and builder-style overrides.
///
/// # Example
///
/// ```
/// use slicelife::config::MergeConfig;
/// use slicelife::slice::Orientation;
///
/// let config = MergeConfig::default();
/// assert_eq!(config.orientation(), Orientation::Vertical);
/// assert_eq!(config.quality(), 80);
///
/// let config = MergeConfig::new(Orientation::Horizontal)
///     .with_quality(95)
///     .with_prefix("garden");
/// assert_eq!(config.quality(), 95);
/// assert_eq!(config.prefix(), Some("garden"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    orientation: Orientation,
    quality: u8,
    workers: Option<usize>,
    prefix: Option<String>,
    output_dir: Option<PathBuf>,
    error_policy: SliceErrorPolicy,
}

impl MergeConfig {
    /// Create a configuration slicing in `orientation`, defaults elsewhere.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    /// Set the slicing orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the JPEG quality, clamped to 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Use exactly `workers` worker threads (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Prefix output file names; a blank prefix clears it.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.trim().is_empty() {
            None
        } else {
            Some(prefix)
        };
        self
    }

    /// Write output into `dir` instead of the current directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the per-slice error policy.
    pub fn with_error_policy(mut self, policy: SliceErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Worker count, resolving "unset" to the hardware default.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(default_pool_size)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Output directory; `None` means the current directory.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn error_policy(&self) -> SliceErrorPolicy {
        self.error_policy
    }

    /// The subset the pipeline needs.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_orientation(self.orientation)
            .with_workers(self.workers())
            .with_error_policy(self.error_policy)
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            quality: DEFAULT_JPEG_QUALITY,
            workers: None,
            prefix: None,
            output_dir: None,
            error_policy: SliceErrorPolicy::default(),
        }
    }
}

impl From<&MergeSettings> for MergeConfig {
    fn from(settings: &MergeSettings) -> Self {
        Self {
            orientation: settings.orientation,
            quality: settings.quality.clamp(1, 100),
            workers: settings.workers.map(|n| n.max(1)),
            prefix: settings.prefix.clone(),
            output_dir: settings.output_dir.clone(),
            error_policy: settings.on_slice_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MergeConfig::default();
        assert_eq!(config.orientation(), Orientation::Vertical);
        assert_eq!(config.quality(), DEFAULT_JPEG_QUALITY);
        assert_eq!(config.workers(), default_pool_size());
        assert_eq!(config.prefix(), None);
        assert_eq!(config.output_dir(), None);
        assert_eq!(config.error_policy(), SliceErrorPolicy::ContinueOnError);
    }

    #[test]
    fn test_builder_chain() {
        let config = MergeConfig::new(Orientation::Horizontal)
            .with_quality(0)
            .with_workers(0)
            .with_prefix("front")
            .with_output_dir("/tmp/out")
            .with_error_policy(SliceErrorPolicy::FailFast);

        assert_eq!(config.orientation(), Orientation::Horizontal);
        assert_eq!(config.quality(), 1);
        assert_eq!(config.workers(), 1);
        assert_eq!(config.prefix(), Some("front"));
        assert_eq!(config.output_dir(), Some(Path::new("/tmp/out")));
        assert_eq!(config.error_policy(), SliceErrorPolicy::FailFast);
    }

    #[test]
    fn test_blank_prefix_clears() {
        let config = MergeConfig::default().with_prefix("a").with_prefix(" ");
        assert_eq!(config.prefix(), None);
    }

    #[test]
    fn test_pipeline_config_carries_settings() {
        let pipeline = MergeConfig::new(Orientation::Horizontal)
            .with_workers(5)
            .with_error_policy(SliceErrorPolicy::FailFast)
            .pipeline_config();

        assert_eq!(pipeline.orientation, Orientation::Horizontal);
        assert_eq!(pipeline.workers, 5);
        assert_eq!(pipeline.error_policy, SliceErrorPolicy::FailFast);
    }

    #[test]
    fn test_from_settings() {
        let settings = MergeSettings {
            orientation: Orientation::Horizontal,
            quality: 70,
            workers: Some(2),
            prefix: Some("x".to_string()),
            output_dir: None,
            on_slice_error: SliceErrorPolicy::FailFast,
        };
        let config = MergeConfig::from(&settings);

        assert_eq!(config.orientation(), Orientation::Horizontal);
        assert_eq!(config.quality(), 70);
        assert_eq!(config.workers(), 2);
        assert_eq!(config.prefix(), Some("x"));
        assert_eq!(config.error_policy(), SliceErrorPolicy::FailFast);
    }
}
