//! Error types for the slicing pipeline.

use crate::codec::DecodeError;
use crate::slice::SliceJob;
use std::io;
use thiserror::Error;

/// Fatal pipeline errors.
///
/// Any of these aborts the run; the caller gets no canvas and nothing is
/// written to disk.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No source images were supplied
    #[error("no images to work with")]
    EmptyInput,

    /// The reference image could not be read, so the canvas size is unknown
    #[error("cannot load reference image: {0}")]
    ReferenceLoad(#[source] DecodeError),

    /// A slice failed to load under the fail-fast policy
    #[error("slice {index} failed to load: {source}")]
    SliceLoad {
        index: usize,
        #[source]
        source: DecodeError,
    },

    /// A pipeline thread could not be started
    #[error("failed to spawn {role} thread: {source}")]
    ThreadSpawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// Every worker exited while jobs were still being handed out
    #[error("all workers exited before slice {index} could be handed off")]
    WorkersDisconnected { index: usize },

    /// The combiner thread panicked and took the canvas with it
    #[error("combiner thread panicked")]
    CombinerPanicked,

    /// Shutdown finished but some emitted slices were never accounted for
    #[error("drain incomplete: {emitted} slices emitted, {accounted} accounted for")]
    IncompleteDrain { emitted: usize, accounted: usize },
}

/// A slice whose source image could not be loaded.
///
/// Under the continue-on-error policy the slice's band is left untouched and
/// the failure is returned alongside the canvas.
#[derive(Debug)]
pub struct SliceFailure {
    /// The job that failed
    pub job: SliceJob,
    /// Why it failed
    pub error: DecodeError,
}

impl SliceFailure {
    /// Turn this failure into the fatal error reported under fail-fast.
    pub fn into_error(self) -> PipelineError {
        PipelineError::SliceLoad {
            index: self.job.index(),
            source: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::SliceRect;
    use std::path::PathBuf;

    #[test]
    fn test_empty_input_display() {
        assert_eq!(PipelineError::EmptyInput.to_string(), "no images to work with");
    }

    #[test]
    fn test_failure_into_error_keeps_index_and_source() {
        let failure = SliceFailure {
            job: SliceJob::new(4, "/p/e.jpg", SliceRect::new(8, 0, 2, 10)),
            error: DecodeError::Corrupt {
                path: PathBuf::from("/p/e.jpg"),
                reason: "bad huffman table".to_string(),
            },
        };

        let err = failure.into_error();
        assert!(matches!(err, PipelineError::SliceLoad { index: 4, .. }));
        assert!(err.to_string().contains("bad huffman table"));
    }

    #[test]
    fn test_incomplete_drain_display() {
        let err = PipelineError::IncompleteDrain {
            emitted: 5,
            accounted: 4,
        };
        assert_eq!(
            err.to_string(),
            "drain incomplete: 5 slices emitted, 4 accounted for"
        );
    }
}
