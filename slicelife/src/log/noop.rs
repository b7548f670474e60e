//! No-operation logger implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// A logger that discards all messages.
///
/// Used by the unit and integration tests so pipeline runs stay quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_logger_as_trait_object() {
        let logger: Box<dyn Logger> = Box::new(NoOpLogger);
        logger.info(format_args!("test message"));
        logger.error(format_args!("error message"));
    }

    #[test]
    fn test_noop_logger_debug_impl() {
        assert_eq!(format!("{:?}", NoOpLogger), "NoOpLogger");
    }
}
