//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::codec::DEFAULT_JPEG_QUALITY;
use crate::pipeline::SliceErrorPolicy;
use crate::slice::Orientation;

/// Default JPEG quality for merged images.
pub const DEFAULT_QUALITY: u8 = DEFAULT_JPEG_QUALITY;

/// Lowest accepted JPEG quality.
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted JPEG quality.
pub const MAX_QUALITY: u8 = 100;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "slicelife.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            merge: MergeSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            quality: DEFAULT_QUALITY,
            workers: None,
            prefix: None,
            output_dir: None,
            on_slice_error: SliceErrorPolicy::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}
