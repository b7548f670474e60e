//! slicelife - time-slice photo compositing
//!
//! Takes an ordered series of photos of the same scene and builds one image
//! in which each photo contributes a vertical (or horizontal) band, so the
//! picture reads as a timeline from left to right (or top to bottom).
//!
//! # High-Level API
//!
//! For most use cases, the [`merge`] module provides a simplified facade:
//!
//! ```no_run
//! use slicelife::config::MergeConfig;
//! use slicelife::log::TracingLogger;
//! use slicelife::merge::SliceOfLife;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let merger = SliceOfLife::new(MergeConfig::default(), Arc::new(TracingLogger));
//! let outcome = merger.merge_directory(Path::new("photos"))?;
//! # Ok::<(), slicelife::merge::MergeError>(())
//! ```
//!
//! The [`pipeline`] module exposes the concurrent composition engine on its
//! own, for callers that bring their own image list or loader.

pub mod codec;
pub mod config;
pub mod log;
pub mod logging;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod slice;
pub mod source;

/// Version of the slicelife library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
