//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::{MAX_QUALITY, MIN_QUALITY};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [merge] section
    if let Some(section) = ini.section(Some("merge")) {
        if let Some(v) = section.get("orientation") {
            config.merge.orientation = v.parse().map_err(|_| {
                invalid("merge", "orientation", v, "must be 'vertical' or 'horizontal'")
            })?;
        }
        if let Some(v) = section.get("quality") {
            config.merge.quality = v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|q| (MIN_QUALITY..=MAX_QUALITY).contains(q))
                .ok_or_else(|| invalid("merge", "quality", v, "must be an integer from 1 to 100"))?;
        }
        if let Some(v) = section.get("workers") {
            let v = v.trim();
            if !v.is_empty() && !v.eq_ignore_ascii_case("auto") {
                let workers = v
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| {
                        invalid("merge", "workers", v, "must be a positive integer or 'auto'")
                    })?;
                config.merge.workers = Some(workers);
            }
        }
        if let Some(v) = section.get("prefix") {
            let v = v.trim();
            if !v.is_empty() {
                config.merge.prefix = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("output_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.merge.output_dir = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("on_slice_error") {
            config.merge.on_slice_error = v.parse().map_err(|_| {
                invalid("merge", "on_slice_error", v, "must be 'skip' or 'abort'")
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::pipeline::SliceErrorPolicy;
    use crate::slice::Orientation;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_merge_section_overlays_defaults() {
        let config = parse(
            "[merge]\norientation = horizontal\nquality = 92\nworkers = 3\nprefix = garden\non_slice_error = abort\n",
        )
        .unwrap();

        assert_eq!(config.merge.orientation, Orientation::Horizontal);
        assert_eq!(config.merge.quality, 92);
        assert_eq!(config.merge.workers, Some(3));
        assert_eq!(config.merge.prefix.as_deref(), Some("garden"));
        assert_eq!(config.merge.on_slice_error, SliceErrorPolicy::FailFast);
        assert!(config.merge.output_dir.is_none());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = parse("[merge]\nworkers = auto\nprefix =\noutput_dir =\n").unwrap();
        assert_eq!(config.merge.workers, None);
        assert_eq!(config.merge.prefix, None);
        assert_eq!(config.merge.output_dir, None);
        assert_eq!(config.merge.quality, DEFAULT_QUALITY);
    }

    #[test]
    fn test_invalid_quality() {
        for bad in ["0", "101", "high"] {
            let err = parse(&format!("[merge]\nquality = {}\n", bad)).unwrap_err();
            match err {
                ConfigFileError::InvalidValue { section, key, value, .. } => {
                    assert_eq!(section, "merge");
                    assert_eq!(key, "quality");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_invalid_orientation_and_workers() {
        assert!(parse("[merge]\norientation = diagonal\n").is_err());
        assert!(parse("[merge]\nworkers = 0\n").is_err());
        assert!(parse("[merge]\non_slice_error = retry\n").is_err());
    }

    #[test]
    fn test_logging_file_expands_tilde() {
        let config = parse("[logging]\nfile = ~/logs/slicelife.log\n").unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.logging.file, home.join("logs/slicelife.log"));
        }
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/log/x.log"), PathBuf::from("/var/log/x.log"));
    }
}
