//! Worker pool that decodes and crops slices.
//!
//! Each worker is a named OS thread blocked in a `select!` over two
//! rendezvous channels: the job channel, shared by all workers, and a
//! dedicated stop channel. A job is only handed off when a worker is ready to
//! take it, so at most one decoded image per worker is alive at any time.
//!
//! A worker exits on the first of:
//! - receiving a stop signal
//! - either channel disconnecting
//! - the combiner going away (its outcome send fails)
//!
//! The pool holds only the sending halves. Once every worker has exited, a
//! blocked `submit` or stop send returns an error instead of hanging.

use super::error::{PipelineError, SliceFailure};
use crate::codec::ImageLoader;
use crate::log::Logger;
use crate::slice::{CroppedSlice, SliceJob};
use crate::{log_debug, log_error, log_trace};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use image::{imageops, DynamicImage, RgbaImage};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Number of workers to use when none is configured.
///
/// One less than the available hardware parallelism, leaving a core for the
/// combiner, and never less than one.
pub fn default_pool_size() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

/// Result of processing one job, sent from a worker to the combiner.
#[derive(Debug)]
pub enum SliceOutcome {
    /// The slice was decoded and cropped
    Cropped(CroppedSlice),
    /// The source image could not be loaded
    Failed(SliceFailure),
}

impl SliceOutcome {
    /// Index of the job this outcome belongs to.
    pub fn index(&self) -> usize {
        match self {
            SliceOutcome::Cropped(slice) => slice.job.index(),
            SliceOutcome::Failed(failure) => failure.job.index(),
        }
    }
}

/// What happened during [`WorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolShutdown {
    /// Stop signals accepted by a worker
    pub stop_signals: usize,
    /// Workers whose thread panicked
    pub panicked: usize,
}

/// Fixed-size pool of slice workers.
pub struct WorkerPool {
    jobs: Sender<SliceJob>,
    stop: Sender<()>,
    handles: Vec<JoinHandle<()>>,
    logger: Arc<dyn Logger>,
}

impl WorkerPool {
    /// Start `size` workers (at least one).
    ///
    /// Every worker gets its own clone of `outcomes`; the caller's sender is
    /// consumed, so the combiner's receive loop ends once all workers exit.
    pub fn spawn(
        size: usize,
        loader: Arc<dyn ImageLoader>,
        outcomes: Sender<SliceOutcome>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, PipelineError> {
        let size = size.max(1);
        let (jobs_tx, jobs_rx) = bounded::<SliceJob>(0);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let mut handles = Vec::with_capacity(size);
        for id in 0..size {
            let jobs = jobs_rx.clone();
            let stop = stop_rx.clone();
            let outcomes = outcomes.clone();
            let loader = Arc::clone(&loader);
            let worker_logger = Arc::clone(&logger);

            let spawned = thread::Builder::new()
                .name(format!("slice-worker-{}", id))
                .spawn(move || worker_loop(id, jobs, stop, outcomes, loader, worker_logger));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    log_error!(logger, "Failed to spawn slice worker {}: {}", id, source);
                    // Disconnecting both channels makes the started workers exit.
                    drop(jobs_tx);
                    drop(stop_tx);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PipelineError::ThreadSpawn {
                        role: "worker",
                        source,
                    });
                }
            }
        }

        log_debug!(logger, "Started {} slice workers", size);
        Ok(Self {
            jobs: jobs_tx,
            stop: stop_tx,
            handles,
            logger,
        })
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Hand `job` to the next idle worker, blocking until one accepts it.
    ///
    /// Returns the job back if every worker has exited.
    pub fn submit(&self, job: SliceJob) -> Result<(), SliceJob> {
        self.jobs.send(job).map_err(|e| e.into_inner())
    }

    /// Send one stop signal per worker and wait for all of them to exit.
    ///
    /// Each send blocks until some worker takes it, so a worker still busy
    /// with a slice finishes (and forwards) that slice before stopping.
    pub fn shutdown(self) -> PoolShutdown {
        let WorkerPool {
            jobs,
            stop,
            handles,
            logger,
        } = self;

        let mut stop_signals = 0;
        for _ in 0..handles.len() {
            if stop.send(()).is_err() {
                break;
            }
            stop_signals += 1;
        }
        log_debug!(logger, "Sent {} stop signals to {} workers", stop_signals, handles.len());

        drop(jobs);
        drop(stop);

        let mut panicked = 0;
        for handle in handles {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        if panicked > 0 {
            log_error!(logger, "{} slice workers panicked", panicked);
        }

        PoolShutdown {
            stop_signals,
            panicked,
        }
    }
}

fn worker_loop(
    id: usize,
    jobs: Receiver<SliceJob>,
    stop: Receiver<()>,
    outcomes: Sender<SliceOutcome>,
    loader: Arc<dyn ImageLoader>,
    logger: Arc<dyn Logger>,
) {
    loop {
        select! {
            recv(stop) -> _ => {
                log_trace!(logger, "Worker {} stopping", id);
                return;
            }
            recv(jobs) -> msg => {
                let Ok(job) = msg else {
                    return;
                };
                let outcome = process_job(loader.as_ref(), job);
                if outcomes.send(outcome).is_err() {
                    log_error!(logger, "Worker {} lost the combiner, exiting", id);
                    return;
                }
            }
        }
    }
}

/// Decode the job's source image and crop its band.
pub fn process_job(loader: &dyn ImageLoader, job: SliceJob) -> SliceOutcome {
    match loader.decode(job.path()) {
        Ok(source) => {
            let pixels = crop_slice(&source, &job);
            SliceOutcome::Cropped(CroppedSlice { job, pixels })
        }
        Err(error) => SliceOutcome::Failed(SliceFailure { job, error }),
    }
}

/// Copy the job's crop rectangle out of `source`.
///
/// The result always has the destination's dimensions. Where the crop
/// extends past the source (a photo smaller than the reference), those pixels
/// stay fully transparent.
pub fn crop_slice(source: &DynamicImage, job: &SliceJob) -> RgbaImage {
    let crop = job.source_crop();
    let visible = source
        .crop_imm(crop.x, crop.y, crop.width, crop.height)
        .to_rgba8();
    if visible.dimensions() == (crop.width, crop.height) {
        return visible;
    }

    let mut pixels = RgbaImage::new(crop.width, crop.height);
    imageops::replace(&mut pixels, &visible, 0, 0);
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeError;
    use crate::log::NoOpLogger;
    use crate::slice::SliceRect;
    use image::Rgba;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Produces a solid image whose red channel encodes the file stem.
    struct SolidLoader {
        width: u32,
        height: u32,
        decodes: AtomicUsize,
    }

    impl SolidLoader {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                decodes: AtomicUsize::new(0),
            }
        }
    }

    impl ImageLoader for SolidLoader {
        fn decode(&self, path: &Path) -> Result<DynamicImage, DecodeError> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            let stem: u8 = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| DecodeError::Corrupt {
                    path: path.to_path_buf(),
                    reason: "not a number".to_string(),
                })?;
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                self.width,
                self.height,
                Rgba([stem, 0, 0, 255]),
            )))
        }
    }

    fn job(index: usize, name: &str, rect: SliceRect) -> SliceJob {
        SliceJob::new(index, PathBuf::from(name), rect)
    }

    #[test]
    fn test_default_pool_size_is_at_least_one() {
        assert!(default_pool_size() >= 1);
    }

    #[test]
    fn test_crop_slice_copies_band() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(10, 4, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }));
        let pixels = crop_slice(&source, &job(0, "a", SliceRect::new(3, 0, 2, 4)));

        assert_eq!(pixels.dimensions(), (2, 4));
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([3, 0, 0, 255]));
        assert_eq!(pixels.get_pixel(1, 3), &Rgba([4, 3, 0, 255]));
    }

    #[test]
    fn test_crop_slice_pads_small_source() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])));
        let pixels = crop_slice(&source, &job(0, "a", SliceRect::new(3, 0, 3, 6)));

        assert_eq!(pixels.dimensions(), (3, 6));
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
        assert_eq!(pixels.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(pixels.get_pixel(0, 5), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_crop_slice_entirely_outside_source() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255])));
        let pixels = crop_slice(&source, &job(0, "a", SliceRect::new(5, 0, 2, 2)));

        assert_eq!(pixels.dimensions(), (2, 2));
        assert!(pixels.pixels().all(|p| p == &Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_process_job_reports_failure() {
        let loader = SolidLoader::new(4, 4);
        let outcome = process_job(&loader, job(2, "broken", SliceRect::new(0, 0, 1, 4)));

        match outcome {
            SliceOutcome::Failed(failure) => {
                assert_eq!(failure.job.index(), 2);
                assert_eq!(failure.error.path(), Path::new("broken"));
            }
            other => panic!("expected failure, got {:?}", other.index()),
        }
    }

    #[test]
    fn test_pool_processes_every_job() {
        let loader = Arc::new(SolidLoader::new(8, 2));
        let (tx, rx) = bounded(0);
        let pool = WorkerPool::spawn(3, loader.clone(), tx, Arc::new(NoOpLogger)).unwrap();

        let collector = thread::spawn(move || rx.iter().map(|o| o.index()).collect::<Vec<_>>());

        for i in 0..8u32 {
            pool.submit(job(i as usize, &format!("{}", i), SliceRect::new(i, 0, 1, 2)))
                .unwrap();
        }
        let shutdown = pool.shutdown();

        let mut seen = collector.join().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert_eq!(loader.decodes.load(Ordering::SeqCst), 8);
        assert_eq!(shutdown.panicked, 0);
    }

    #[test]
    fn test_shutdown_sends_one_stop_per_worker() {
        for size in [1, 4] {
            let (tx, rx) = bounded(0);
            let pool =
                WorkerPool::spawn(size, Arc::new(SolidLoader::new(1, 1)), tx, Arc::new(NoOpLogger))
                    .unwrap();
            assert_eq!(pool.size(), size);

            let collector = thread::spawn(move || rx.iter().count());
            let shutdown = pool.shutdown();

            assert_eq!(shutdown.stop_signals, size);
            assert_eq!(collector.join().unwrap(), 0);
        }
    }

    #[test]
    fn test_zero_size_pool_gets_one_worker() {
        let (tx, _rx) = bounded(0);
        let pool =
            WorkerPool::spawn(0, Arc::new(SolidLoader::new(1, 1)), tx, Arc::new(NoOpLogger))
                .unwrap();
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.shutdown().stop_signals, 1);
    }

    #[test]
    fn test_workers_exit_when_combiner_is_gone() {
        let (tx, rx) = bounded(0);
        let pool =
            WorkerPool::spawn(2, Arc::new(SolidLoader::new(2, 2)), tx, Arc::new(NoOpLogger))
                .unwrap();
        drop(rx);

        // Both workers take a job, fail to forward it and exit.
        let _ = pool.submit(job(0, "0", SliceRect::new(0, 0, 1, 2)));
        let _ = pool.submit(job(1, "1", SliceRect::new(1, 0, 1, 2)));
        let rejected = pool.submit(job(2, "2", SliceRect::new(0, 0, 1, 1)));

        assert!(rejected.is_err());
        let shutdown = pool.shutdown();
        assert_eq!(shutdown.stop_signals, 0);
        assert_eq!(shutdown.panicked, 0);
    }
}
