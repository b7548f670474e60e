//! Pipeline coordinator.
//!
//! Drives one composition through its lifecycle:
//!
//! ```text
//! Init ──► Producing ──► Draining ──► Closed
//!  │         (combiner runs concurrently)
//!  └──► EmptyInput / ReferenceLoad
//! ```
//!
//! - **Init**: decode the reference image for its size, allocate the canvas, start the
//!   combiner and the worker pool
//! - **Producing**: walk the partition, handing each job to a worker
//! - **Draining**: send exactly one stop signal per worker, join the workers,
//!   then join the combiner once the outcome channel closes
//! - **Closed**: check every emitted job was drawn or recorded as failed
//!
//! Completion is decided by counting, never by timing: `emitted` is compared
//! against what the combiner accounted for after every thread has been joined.

use super::combiner::Combiner;
use super::error::{PipelineError, SliceFailure};
use super::policy::SliceErrorPolicy;
use super::worker::{default_pool_size, WorkerPool};
use crate::codec::ImageLoader;
use crate::log::Logger;
use crate::slice::{Orientation, Partition};
use crate::{log_debug, log_info, log_warn};
use crossbeam_channel::bounded;
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle state of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Producing,
    Draining,
    Closed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Init => "init",
            PipelineState::Producing => "producing",
            PipelineState::Draining => "draining",
            PipelineState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Tunables for one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Direction bands run in
    pub orientation: Orientation,
    /// Worker threads
    pub workers: usize,
    /// Reaction to a slice that fails to load
    pub error_policy: SliceErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            workers: default_pool_size(),
            error_policy: SliceErrorPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the slicing orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the worker count (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the per-slice error policy.
    pub fn with_error_policy(mut self, policy: SliceErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// A finished composition.
#[derive(Debug)]
pub struct Composition {
    /// The assembled canvas, sized like the reference image
    pub canvas: RgbaImage,
    /// Orientation the canvas was sliced in
    pub orientation: Orientation,
    /// Jobs handed to workers
    pub emitted: usize,
    /// Slices drawn
    pub drawn: usize,
    /// Slices left blank because their image failed to load
    pub failures: Vec<SliceFailure>,
    /// Trailing images that got no band (more images than pixels)
    pub dropped: usize,
    /// Worker threads used
    pub workers: usize,
    /// Stop signals accepted during drain
    pub stop_signals: usize,
    /// Wall-clock time from init to close
    pub elapsed: Duration,
}

impl Composition {
    /// True when every emitted slice was drawn.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.drawn == self.emitted
    }
}

/// Composes a canvas from a list of images using a worker pool.
pub struct SlicePipeline {
    config: PipelineConfig,
    loader: Arc<dyn ImageLoader>,
    logger: Arc<dyn Logger>,
}

impl SlicePipeline {
    /// Create a pipeline.
    pub fn new(
        config: PipelineConfig,
        loader: Arc<dyn ImageLoader>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config,
            loader,
            logger,
        }
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compose `paths` into a single canvas.
    ///
    /// The first path is the reference image: it fixes the canvas size and
    /// fills the first band. Order is significant.
    pub fn compose(&self, paths: &[PathBuf]) -> Result<Composition, PipelineError> {
        let started = Instant::now();
        let logger = &self.logger;
        let policy = self.config.error_policy;
        self.enter(PipelineState::Init);

        let reference = paths.first().ok_or(PipelineError::EmptyInput)?;
        // Decoded in full: a reference with damaged pixel data must fail
        // before any worker starts. Job 0 decodes it again in a worker.
        let (width, height) = self
            .loader
            .decode(reference)
            .map(|img| (img.width(), img.height()))
            .map_err(PipelineError::ReferenceLoad)?;

        let partition = Partition::new(self.config.orientation, width, height, paths.to_vec());
        let dropped = partition.dropped();
        if dropped > 0 {
            log_warn!(
                logger,
                "{} images but only {} {} pixels; the last {} images are skipped",
                paths.len(),
                self.config.orientation.extent(width, height),
                self.config.orientation,
                dropped
            );
        }
        log_info!(
            logger,
            "Composing {} slices onto {}x{} canvas ({}, {} workers)",
            partition.job_count(),
            width,
            height,
            self.config.orientation,
            self.config.workers
        );

        let (outcome_tx, outcome_rx) = bounded(0);
        let abort = Arc::new(AtomicBool::new(false));
        let combiner = Combiner::spawn(
            width,
            height,
            outcome_rx,
            policy,
            Arc::clone(&abort),
            Arc::clone(logger),
        )?;

        // A failed spawn drops every outcome sender, so the combiner exits.
        let pool = match WorkerPool::spawn(
            self.config.workers,
            Arc::clone(&self.loader),
            outcome_tx,
            Arc::clone(logger),
        ) {
            Ok(pool) => pool,
            Err(e) => {
                let _ = combiner.finish();
                return Err(e);
            }
        };
        let workers = pool.size();

        self.enter(PipelineState::Producing);
        let produced = produce(&pool, partition, &abort, logger.as_ref());

        self.enter(PipelineState::Draining);
        let shutdown = pool.shutdown();
        let report = combiner.finish()?;

        self.enter(PipelineState::Closed);
        let emitted = produced?;
        let accounted = report.accounted();
        if accounted != emitted {
            return Err(PipelineError::IncompleteDrain { emitted, accounted });
        }

        let mut failures = report.failures;
        if policy == SliceErrorPolicy::FailFast && !failures.is_empty() {
            return Err(failures.swap_remove(0).into_error());
        }

        let composition = Composition {
            canvas: report.canvas,
            orientation: self.config.orientation,
            emitted,
            drawn: report.drawn,
            failures,
            dropped,
            workers,
            stop_signals: shutdown.stop_signals,
            elapsed: started.elapsed(),
        };
        log_info!(
            logger,
            "Composed {} of {} slices in {:.2?}",
            composition.drawn,
            composition.emitted,
            composition.elapsed
        );
        Ok(composition)
    }

    fn enter(&self, state: PipelineState) {
        log_debug!(self.logger, "Pipeline state: {}", state);
    }
}

/// Hand each job to a worker. Returns how many were emitted.
fn produce(
    pool: &WorkerPool,
    partition: Partition,
    abort: &AtomicBool,
    logger: &dyn Logger,
) -> Result<usize, PipelineError> {
    let mut emitted = 0;
    for job in partition {
        if abort.load(Ordering::SeqCst) {
            log_debug!(logger, "Abort raised, stopping after {} slices", emitted);
            break;
        }
        let index = job.index();
        pool.submit(job)
            .map_err(|_| PipelineError::WorkersDisconnected { index })?;
        emitted += 1;
    }
    Ok(emitted)
}
