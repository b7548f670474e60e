//! Single-writer canvas assembly.
//!
//! The combiner thread is the only code that ever touches the canvas. It
//! drains worker outcomes until every sender has gone away, so when
//! [`Combiner::finish`] returns, no slice can be drawn anymore.

use super::error::{PipelineError, SliceFailure};
use super::policy::SliceErrorPolicy;
use super::worker::SliceOutcome;
use crate::log::Logger;
use crate::slice::CroppedSlice;
use crate::{log_debug, log_error, log_warn};
use crossbeam_channel::Receiver;
use image::{imageops, RgbaImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Everything the combiner hands back once the channel closes.
#[derive(Debug)]
pub struct CombinerReport {
    /// The assembled canvas
    pub canvas: RgbaImage,
    /// Slices drawn onto the canvas
    pub drawn: usize,
    /// Slices that failed to load, in arrival order
    pub failures: Vec<SliceFailure>,
}

impl CombinerReport {
    /// Slices the combiner saw, drawn or failed.
    pub fn accounted(&self) -> usize {
        self.drawn + self.failures.len()
    }
}

/// Handle to the running combiner thread.
pub struct Combiner {
    handle: JoinHandle<CombinerReport>,
}

impl Combiner {
    /// Start the combiner on a fresh, fully transparent `width × height`
    /// canvas.
    ///
    /// Under [`SliceErrorPolicy::FailFast`] the first failure raises `abort`,
    /// which the producer checks before handing out each job.
    pub fn spawn(
        width: u32,
        height: u32,
        outcomes: Receiver<SliceOutcome>,
        policy: SliceErrorPolicy,
        abort: Arc<AtomicBool>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, PipelineError> {
        let handle = thread::Builder::new()
            .name("slice-combiner".to_string())
            .spawn(move || {
                let canvas = RgbaImage::new(width, height);
                combine(canvas, outcomes, policy, &abort, logger.as_ref())
            })
            .map_err(|source| PipelineError::ThreadSpawn {
                role: "combiner",
                source,
            })?;

        Ok(Self { handle })
    }

    /// Wait for the outcome channel to close and take the result.
    pub fn finish(self) -> Result<CombinerReport, PipelineError> {
        self.handle
            .join()
            .map_err(|_| PipelineError::CombinerPanicked)
    }
}

fn combine(
    mut canvas: RgbaImage,
    outcomes: Receiver<SliceOutcome>,
    policy: SliceErrorPolicy,
    abort: &AtomicBool,
    logger: &dyn Logger,
) -> CombinerReport {
    let mut drawn = 0;
    let mut failures = Vec::new();

    for outcome in outcomes.iter() {
        match outcome {
            SliceOutcome::Cropped(slice) => {
                draw_slice(&mut canvas, &slice);
                drawn += 1;
                log_debug!(
                    logger,
                    "Drew slice {} at {}",
                    slice.job.index(),
                    slice.job.destination()
                );
            }
            SliceOutcome::Failed(failure) => {
                match policy {
                    SliceErrorPolicy::FailFast => {
                        log_error!(
                            logger,
                            "Slice {} failed, aborting: {}",
                            failure.job.index(),
                            failure.error
                        );
                        abort.store(true, Ordering::SeqCst);
                    }
                    SliceErrorPolicy::ContinueOnError => {
                        log_warn!(
                            logger,
                            "Skipping slice {} at {}: {}",
                            failure.job.index(),
                            failure.job.destination(),
                            failure.error
                        );
                    }
                }
                failures.push(failure);
            }
        }
    }

    CombinerReport {
        canvas,
        drawn,
        failures,
    }
}

/// Copy a slice's pixels onto the canvas at its destination.
///
/// Pixels are copied verbatim, alpha included; nothing is blended.
pub fn draw_slice(canvas: &mut RgbaImage, slice: &CroppedSlice) {
    let dest = slice.job.destination();
    imageops::replace(canvas, &slice.pixels, i64::from(dest.x), i64::from(dest.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeError;
    use crate::log::NoOpLogger;
    use crate::slice::{SliceJob, SliceRect};
    use crossbeam_channel::bounded;
    use image::Rgba;

    fn cropped(index: usize, rect: SliceRect, value: u8) -> SliceOutcome {
        SliceOutcome::Cropped(CroppedSlice {
            job: SliceJob::new(index, format!("{}.png", index), rect),
            pixels: RgbaImage::from_pixel(
                rect.width,
                rect.height,
                Rgba([value, value, value, 255]),
            ),
        })
    }

    fn failed(index: usize, rect: SliceRect) -> SliceOutcome {
        let job = SliceJob::new(index, format!("{}.png", index), rect);
        let error = DecodeError::Corrupt {
            path: job.path().to_path_buf(),
            reason: "truncated".to_string(),
        };
        SliceOutcome::Failed(SliceFailure { job, error })
    }

    fn run(policy: SliceErrorPolicy, outcomes: Vec<SliceOutcome>) -> (CombinerReport, bool) {
        let (tx, rx) = bounded(0);
        let abort = Arc::new(AtomicBool::new(false));
        let combiner =
            Combiner::spawn(4, 2, rx, policy, Arc::clone(&abort), Arc::new(NoOpLogger)).unwrap();
        for outcome in outcomes {
            tx.send(outcome).unwrap();
        }
        drop(tx);
        let report = combiner.finish().unwrap();
        (report, abort.load(Ordering::SeqCst))
    }

    #[test]
    fn test_draws_slices_at_destination() {
        let (report, aborted) = run(
            SliceErrorPolicy::ContinueOnError,
            vec![
                cropped(1, SliceRect::new(2, 0, 2, 2), 200),
                cropped(0, SliceRect::new(0, 0, 2, 2), 100),
            ],
        );

        assert!(!aborted);
        assert_eq!(report.drawn, 2);
        assert_eq!(report.canvas.get_pixel(1, 1), &Rgba([100, 100, 100, 255]));
        assert_eq!(report.canvas.get_pixel(2, 0), &Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn test_untouched_canvas_is_transparent() {
        let (report, _) = run(SliceErrorPolicy::ContinueOnError, Vec::new());
        assert_eq!(report.canvas.dimensions(), (4, 2));
        assert!(report.canvas.pixels().all(|p| p == &Rgba([0, 0, 0, 0])));
        assert_eq!(report.accounted(), 0);
    }

    #[test]
    fn test_continue_leaves_failed_band_blank() {
        let (report, aborted) = run(
            SliceErrorPolicy::ContinueOnError,
            vec![
                cropped(0, SliceRect::new(0, 0, 2, 2), 50),
                failed(1, SliceRect::new(2, 0, 2, 2)),
            ],
        );

        assert!(!aborted);
        assert_eq!(report.drawn, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.accounted(), 2);
        assert_eq!(report.canvas.get_pixel(3, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_fail_fast_raises_abort() {
        let (report, aborted) = run(
            SliceErrorPolicy::FailFast,
            vec![failed(0, SliceRect::new(0, 0, 2, 2))],
        );

        assert!(aborted);
        assert_eq!(report.failures[0].job.index(), 0);
    }

    #[test]
    fn test_draw_slice_replaces_alpha() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let slice = CroppedSlice {
            job: SliceJob::new(0, "a.png", SliceRect::new(1, 0, 1, 1)),
            pixels: RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0])),
        };

        draw_slice(&mut canvas, &slice);

        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgba([10, 20, 30, 0]));
    }
}
