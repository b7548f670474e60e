//! slicelife CLI - Command-line interface
//!
//! This binary provides a command-line interface to the slicelife library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use commands::merge::MergeArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slicelife")]
#[command(version)]
#[command(about = "Merge a series of photos into a single time-slice image", long_about = None)]
struct Cli {
    /// Enable debug logging (also echoed to stdout)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.slicelife/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the photos in a directory into one image
    Merge {
        /// Directory containing the photos (.jpg, .jpeg, .png)
        #[arg(long, short, default_value = ".")]
        dir: PathBuf,

        /// Slice into vertical bands, left to right (default)
        #[arg(long, conflicts_with = "horizontal")]
        vertical: bool,

        /// Slice into horizontal bands, top to bottom
        #[arg(long)]
        horizontal: bool,

        /// Prefix for the output file name
        #[arg(long)]
        prefix: Option<String>,

        /// JPEG quality of the merged image (1-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Number of worker threads (default: CPU count minus one)
        #[arg(long)]
        workers: Option<usize>,

        /// Directory to write the merged image into
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Abort if any photo cannot be loaded instead of leaving its band blank
        #[arg(long)]
        fail_fast: bool,
    },

    /// Create the default config file if missing and print its path
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Merge {
            dir,
            vertical,
            horizontal,
            prefix,
            quality,
            workers,
            output_dir,
            fail_fast,
        } => commands::merge::run(
            MergeArgs {
                dir,
                vertical,
                horizontal,
                prefix,
                quality,
                workers,
                output_dir,
                fail_fast,
            },
            cli.config,
            cli.debug,
        ),
        Commands::Init => commands::init::run(cli.config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
