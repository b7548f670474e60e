//! Init command - write the default config file.

use slicelife::config::{config_file_path, ConfigFile};
use std::path::PathBuf;

use crate::error::CliError;

/// Run the init command.
///
/// Writes a commented default config file unless one already exists, then
/// prints its path.
pub fn run(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let path = config_path.unwrap_or_else(config_file_path);
    let existed = path.exists();
    let path = ConfigFile::ensure_exists_at(&path)?;

    if existed {
        println!("Config file already exists: {}", path.display());
    } else {
        println!("Created config file: {}", path.display());
    }
    Ok(())
}
