//! Concurrent slice composition.
//!
//! ```text
//! coordinator ──jobs──► worker 0..P ──outcomes──► combiner ──► canvas
//!      └──────stop × P──────┘
//! ```
//!
//! All channels are rendezvous (zero-capacity) channels. The coordinator is
//! the only producer of jobs, the combiner is the only writer of the canvas,
//! and shutdown sends exactly one stop signal per worker.

mod combiner;
mod coordinator;
mod error;
mod policy;
mod worker;

pub use combiner::{draw_slice, Combiner, CombinerReport};
pub use coordinator::{Composition, PipelineConfig, PipelineState, SlicePipeline};
pub use error::{PipelineError, SliceFailure};
pub use policy::SliceErrorPolicy;
pub use worker::{
    crop_slice, default_pool_size, process_job, PoolShutdown, SliceOutcome, WorkerPool,
};
