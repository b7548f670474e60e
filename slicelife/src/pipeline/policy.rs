//! What to do when a slice's source image fails to load.

use std::fmt;
use std::str::FromStr;

/// Policy applied to per-slice load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliceErrorPolicy {
    /// Stop handing out jobs, drain what is in flight, and fail the run
    FailFast,
    /// Leave the band blank, record the failure, and keep going
    #[default]
    ContinueOnError,
}

impl SliceErrorPolicy {
    /// Config-file spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SliceErrorPolicy::FailFast => "abort",
            SliceErrorPolicy::ContinueOnError => "skip",
        }
    }
}

impl fmt::Display for SliceErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SliceErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "fail" | "fail-fast" => Ok(SliceErrorPolicy::FailFast),
            "skip" | "continue" => Ok(SliceErrorPolicy::ContinueOnError),
            other => Err(format!(
                "unknown slice error policy '{}', expected 'skip' or 'abort'",
                other
            )),
        }
    }
}
