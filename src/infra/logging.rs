use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

/// Routes logs to a file under `log_dir`; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(config: &LogConfig, log_dir: &Path) -> Result<WorkerGuard, AppError> {
    let appender = tracing_appender::rolling::never(log_dir, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(guard)
}
