//! Logging setup for the `harbor` binary.
//!
//! Logs go to stderr and to a daily-rolling file in the logs directory.

use anyhow::{Context, Result};
use harbor_infrastructure::HarborPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the file writer alive; pending lines are flushed on drop.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber.
///
/// The filter comes from `HARBOR_LOG`, then `RUST_LOG`, then `default_level`.
pub fn init(paths: &HarborPaths, default_level: &str) -> Result<LoggingGuard> {
    paths.ensure_dirs().context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, paths.logs_dir(), "harbor.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("HARBOR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(log_dir = %paths.logs_dir().display(), "Logging initialized");
    Ok(LoggingGuard { _guard: guard })
}
