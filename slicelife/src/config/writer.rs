//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let workers = config
        .merge
        .workers
        .map(|n| n.to_string())
        .unwrap_or_else(|| "auto".to_string());
    let prefix = config.merge.prefix.as_deref().unwrap_or("");
    let output_dir = config
        .merge
        .output_dir
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[merge]
; Band direction:
;   vertical   - columns, left to right (default)
;   horizontal - rows, top to bottom
orientation = {}
; JPEG quality of the merged image, 1-100 (default: 80)
quality = {}
; Worker threads decoding photos; 'auto' uses one less than the CPU count
workers = {}
; Optional prefix for output file names, e.g. 'garden' gives garden_slice_of_life_...
prefix = {}
; Directory for merged images (default: current directory)
output_dir = {}
; When a photo cannot be loaded:
;   skip  - leave its band blank and keep going (default)
;   abort - stop and write nothing
on_slice_error = {}

[logging]
; Log file location (truncated at the start of each run)
file = {}
"#,
        config.merge.orientation,
        config.merge.quality,
        workers,
        prefix,
        output_dir,
        config.merge.on_slice_error,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
