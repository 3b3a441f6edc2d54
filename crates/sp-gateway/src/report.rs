//! # Error Reporting
//!
//! Fire-and-forget log sink handed to the client at construction time.

use tracing::Level;

/// Structured log sink. Implementations must not block or fail the caller.
pub trait Reporter: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards reports to `tracing` under the `shurjopay` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "shurjopay", "{}", message),
            Level::WARN => tracing::warn!(target: "shurjopay", "{}", message),
            Level::INFO => tracing::info!(target: "shurjopay", "{}", message),
            Level::DEBUG => tracing::debug!(target: "shurjopay", "{}", message),
            _ => tracing::trace!(target: "shurjopay", "{}", message),
        }
    }
}
