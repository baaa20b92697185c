use std::env;
use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid LOG_LEVEL filter '{0}': {1}")]
    Filter(String, String),

    #[error("APP_LOG_FILE '{0}' has no file name")]
    LogFilePath(PathBuf),

    #[error("Failed to install subscriber: {0}")]
    Install(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Install the global tracing subscriber.
///
/// Console output is always on, filtered by `LOG_LEVEL` (defaults to INFO).
/// When `APP_LOG_FILE` names a path, the same events also go to a daily
/// rolling file without ANSI escapes.
pub fn init_logging() -> Result<(), LoggingError> {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let filter = EnvFilter::try_new(&level)
        .map_err(|e| LoggingError::Filter(level.clone(), e.to_string()))?;

    let console = fmt::layer().with_target(true).with_filter(filter.clone());
    let registry = tracing_subscriber::registry().with(console);

    let Some(log_file) = env::var("APP_LOG_FILE").ok().map(PathBuf::from) else {
        return registry
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string()));
    };

    let dir = match log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let file_name = log_file
        .file_name()
        .ok_or_else(|| LoggingError::LogFilePath(log_file.clone()))?;

    let file = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(dir, file_name))
        .with_target(true)
        .with_ansi(false)
        .with_filter(filter);

    registry
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
