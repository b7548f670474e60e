//! Merge command - compose a directory of photos into one image.

use slicelife::config::{ConfigFile, MergeConfig};
use slicelife::merge::SliceOfLife;
use slicelife::pipeline::SliceErrorPolicy;
use slicelife::slice::Orientation;
use std::path::PathBuf;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the merge command.
pub struct MergeArgs {
    pub dir: PathBuf,
    pub vertical: bool,
    pub horizontal: bool,
    pub prefix: Option<String>,
    pub quality: Option<u8>,
    pub workers: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub fail_fast: bool,
}

/// Run the merge command.
pub fn run(args: MergeArgs, config_path: Option<PathBuf>, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path.as_deref(), debug)?;
    runner.log_startup("merge", config_path.as_deref());

    let config = resolve_config(&args, runner.config());
    info!(
        orientation = %config.orientation(),
        quality = config.quality(),
        workers = config.workers(),
        policy = %config.error_policy(),
        "Merge settings resolved"
    );

    println!("Merging photos in {}", args.dir.display());
    println!(
        "  Slicing: {} ({} workers)",
        config.orientation(),
        config.workers()
    );

    let merger = SliceOfLife::new(config, runner.logger());
    let outcome = merger.merge_directory(&args.dir)?;
    let composition = &outcome.composition;

    println!(
        "Composed {} of {} images in {:.2}s",
        composition.drawn,
        outcome.images,
        composition.elapsed.as_secs_f64()
    );
    if composition.dropped > 0 {
        println!(
            "  Skipped the last {} images: more images than pixels to slice",
            composition.dropped
        );
    }
    for failure in &composition.failures {
        println!("  Left blank: {}", failure.error);
    }
    println!(
        "Wrote {} ({:.2} MB)",
        outcome.path.display(),
        outcome.bytes_written as f64 / 1_048_576.0
    );

    Ok(())
}

/// Overlay command-line flags on the config file's merge settings.
fn resolve_config(args: &MergeArgs, file: &ConfigFile) -> MergeConfig {
    let mut config = MergeConfig::from(&file.merge);

    if args.horizontal {
        config = config.with_orientation(Orientation::Horizontal);
    } else if args.vertical {
        config = config.with_orientation(Orientation::Vertical);
    }
    if let Some(quality) = args.quality {
        config = config.with_quality(quality);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(prefix) = &args.prefix {
        config = config.with_prefix(prefix.clone());
    }
    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir.clone());
    }
    if args.fail_fast {
        config = config.with_error_policy(SliceErrorPolicy::FailFast);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MergeArgs {
        MergeArgs {
            dir: PathBuf::from("photos"),
            vertical: false,
            horizontal: false,
            prefix: None,
            quality: None,
            workers: None,
            output_dir: None,
            fail_fast: false,
        }
    }

    #[test]
    fn test_config_file_values_apply_without_flags() {
        let mut file = ConfigFile::default();
        file.merge.orientation = Orientation::Horizontal;
        file.merge.quality = 90;
        file.merge.prefix = Some("porch".to_string());

        let config = resolve_config(&args(), &file);
        assert_eq!(config.orientation(), Orientation::Horizontal);
        assert_eq!(config.quality(), 90);
        assert_eq!(config.prefix(), Some("porch"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = ConfigFile::default();
        file.merge.orientation = Orientation::Horizontal;
        file.merge.workers = Some(8);

        let mut flags = args();
        flags.vertical = true;
        flags.workers = Some(2);
        flags.quality = Some(40);
        flags.fail_fast = true;

        let config = resolve_config(&flags, &file);
        assert_eq!(config.orientation(), Orientation::Vertical);
        assert_eq!(config.workers(), 2);
        assert_eq!(config.quality(), 40);
        assert_eq!(config.error_policy(), SliceErrorPolicy::FailFast);
    }

    #[test]
    fn test_horizontal_flag() {
        let mut flags = args();
        flags.horizontal = true;
        let config = resolve_config(&flags, &ConfigFile::default());
        assert_eq!(config.orientation(), Orientation::Horizontal);
    }
}
