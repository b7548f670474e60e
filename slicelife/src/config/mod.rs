//! Configuration for slicelife.
//!
//! - [`MergeConfig`]: runtime options for one merge, built in code or from
//!   the config file
//! - [`ConfigFile`]: the user's `~/.slicelife/config.ini`
//!
//! # Example
//!
//! ```
//! use slicelife::config::{ConfigFile, MergeConfig};
//!
//! let file = ConfigFile::default();
//! let config = MergeConfig::from(&file.merge).with_workers(2);
//! assert_eq!(config.workers(), 2);
//! ```

mod defaults;
mod file;
mod merge;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_FILE_NAME, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use merge::MergeConfig;
pub use settings::{ConfigFile, LoggingSettings, MergeSettings};
