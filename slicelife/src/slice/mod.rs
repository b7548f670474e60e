//! Slice jobs and the policy that partitions a canvas into them.
//!
//! A [`Partition`] walks the sorted source list and yields one [`SliceJob`]
//! per image, each owning a disjoint band of the canvas. Jobs are plain
//! descriptors; the pixels for a job travel separately as a [`CroppedSlice`].

mod job;
mod partition;

pub use job::{CroppedSlice, SliceJob, SliceRect};
pub use partition::{partition_extents, Orientation, Partition};
