//! Logging abstraction layer.
//!
//! Pipeline components never talk to `tracing` directly. They hold an
//! `Arc<dyn Logger>` and log through the `log_*!` macros, so worker threads,
//! the combiner and the coordinator can run silently under test and forward
//! to `tracing` in the CLI.
//!
//! - `Logger` trait: the interface every component logs through
//! - `TracingLogger`: production adapter that delegates to `tracing`
//! - `NoOpLogger`: silent logger for tests
//!
//! ```
//! use slicelife::log::{Logger, NoOpLogger};
//! use slicelife::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct Stage {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Stage {
//!     fn run(&self) {
//!         log_info!(self.logger, "stage starting");
//!         log_debug!(self.logger, "stage done");
//!     }
//! }
//!
//! Stage { logger: Arc::new(NoOpLogger) }.run();
//! ```

mod noop;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
