//! # Logging Setup
//!
//! Console plus file logging. The returned guard flushes the file writer
//! when dropped, so `main` holds it until shutdown.

use crate::state::AppConfig;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: stdout and `{log_dir}/{log_file}`.
pub fn init(config: &AppConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(&config.log_dir, &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    guard
}
