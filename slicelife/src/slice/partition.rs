//! Partition policy: splits the canvas into one band per source image.
//!
//! For `N` images and an extent `E` along the sliced axis, band `i` gets
//! `floor(remaining / (N - i))` pixels (at least one). Bands are contiguous,
//! disjoint and cover the full canvas. When `N > E` the extent runs out after
//! `E` one-pixel bands and the remaining images get no band at all; those
//! trailing jobs are never produced.
//!
//! ```text
//!  Vertical (columns)          Horizontal (rows)
//!  ┌──┬──┬──┬──┐               ┌───────────┐
//!  │0 │1 │2 │3 │               │     0     │
//!  │  │  │  │  │               ├───────────┤
//!  │  │  │  │  │               │     1     │
//!  └──┴──┴──┴──┘               └───────────┘
//! ```

use super::job::{SliceJob, SliceRect};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Axis along which the canvas is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Column bands, left to right
    #[default]
    Vertical,
    /// Row bands, top to bottom
    Horizontal,
}

impl Orientation {
    /// Extent of a `width × height` canvas along the sliced axis.
    pub fn extent(self, width: u32, height: u32) -> u32 {
        match self {
            Orientation::Vertical => width,
            Orientation::Horizontal => height,
        }
    }

    /// Band rectangle at `position` with `step` pixels along the sliced axis.
    fn band(self, position: u32, step: u32, width: u32, height: u32) -> SliceRect {
        match self {
            Orientation::Vertical => SliceRect::new(position, 0, step, height),
            Orientation::Horizontal => SliceRect::new(0, position, width, step),
        }
    }

    /// Config-file spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vertical" | "v" | "columns" => Ok(Orientation::Vertical),
            "horizontal" | "h" | "rows" => Ok(Orientation::Horizontal),
            other => Err(format!(
                "unknown orientation '{}', expected 'vertical' or 'horizontal'",
                other
            )),
        }
    }
}

/// Lazy sequence of slice jobs for one canvas.
///
/// Jobs are computed on demand so the producer never holds the whole job list;
/// the coordinator pulls one job, hands it to a worker, then pulls the next.
#[derive(Debug, Clone)]
pub struct Partition {
    orientation: Orientation,
    width: u32,
    height: u32,
    paths: Vec<PathBuf>,
    index: usize,
    position: u32,
    remaining: u32,
}

impl Partition {
    /// Partition a `width × height` canvas across `paths` in order.
    pub fn new(orientation: Orientation, width: u32, height: u32, paths: Vec<PathBuf>) -> Self {
        Self {
            orientation,
            width,
            height,
            paths,
            index: 0,
            position: 0,
            remaining: orientation.extent(width, height),
        }
    }

    /// Total number of jobs this partition yields.
    pub fn job_count(&self) -> usize {
        job_count(self.orientation.extent(self.width, self.height), self.paths.len())
    }

    /// Number of trailing images that receive no band.
    pub fn dropped(&self) -> usize {
        self.paths.len() - self.job_count()
    }

    /// Orientation being partitioned.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl Iterator for Partition {
    type Item = SliceJob;

    fn next(&mut self) -> Option<SliceJob> {
        let count = self.paths.len();
        if self.remaining == 0 || self.index >= count {
            return None;
        }

        let step = next_step(self.remaining, count - self.index);
        let destination = self
            .orientation
            .band(self.position, step, self.width, self.height);
        let job = SliceJob::new(self.index, self.paths[self.index].clone(), destination);

        self.remaining -= step;
        self.position += step;
        self.index += 1;
        Some(job)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.job_count().saturating_sub(self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Partition {}

/// Width of the next band given what is left of the extent and how many
/// images still need one.
fn next_step(remaining: u32, images_left: usize) -> u32 {
    let images_left = u32::try_from(images_left).unwrap_or(u32::MAX);
    (remaining / images_left).max(1)
}

/// Number of jobs produced for `count` images over `extent` pixels.
fn job_count(extent: u32, count: usize) -> usize {
    count.min(extent as usize)
}

/// Band sizes along the sliced axis, in job order.
///
/// Convenience for callers that only need the arithmetic.
pub fn partition_extents(extent: u32, count: usize) -> Vec<u32> {
    let mut remaining = extent;
    let mut extents = Vec::with_capacity(job_count(extent, count));
    for i in 0..count {
        if remaining == 0 {
            break;
        }
        let step = next_step(remaining, count - i);
        extents.push(step);
        remaining -= step;
    }
    extents
}
