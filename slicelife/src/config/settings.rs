//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::pipeline::SliceErrorPolicy;
use crate::slice::Orientation;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Merge settings
    pub merge: MergeSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Merge configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSettings {
    /// Direction bands run in
    pub orientation: Orientation,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Worker threads; `None` picks one less than the CPU count
    pub workers: Option<usize>,
    /// Prefix prepended to output file names
    pub prefix: Option<String>,
    /// Where output files go; `None` means the current directory
    pub output_dir: Option<PathBuf>,
    /// What to do when a slice's image cannot be loaded
    pub on_slice_error: SliceErrorPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
