//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! - [`init`] - Configuration initialization
//! - [`merge`] - Merge a directory of photos into one image

pub mod init;
pub mod merge;
