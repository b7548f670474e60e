//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers start from a ready environment.

use crate::error::CliError;
use slicelife::config::{config_file_path, ConfigFile};
use slicelife::log::{Logger, TracingLogger};
use slicelife::logging::{init_logging, LoggingGuard};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path`, or the default location) and
    /// initialize logging.
    ///
    /// Log lines go to the configured log file; with `debug_mode` they are
    /// also echoed to stdout at debug level.
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "slicelife.log".to_string());

        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Logger that forwards library logging to `tracing`.
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::new(TracingLogger)
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str, config_path: Option<&Path>) {
        info!("slicelife v{}", slicelife::VERSION);
        info!("slicelife CLI: {} command", command);
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        info!("Config file: {}", path.display());
    }
}
