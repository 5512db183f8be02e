//! File logging backend.
//!
//! Everything logs through the `log` facade. The terminal belongs to the
//! preview, so records only go anywhere when a log file is configured.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum LoggingError {
    /// The log file path has no file name component
    InvalidPath(PathBuf),
    /// The level string is not a valid filter directive
    InvalidLevel(String),
    /// A global logger was already installed
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::InvalidPath(path) => {
                write!(f, "Invalid log file path '{}'", path.display())
            }
            LoggingError::InvalidLevel(level) => write!(f, "Invalid log level '{}'", level),
            LoggingError::AlreadyInitialized(e) => write!(f, "Logger already initialized: {}", e),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|_| LoggingError::InvalidLevel(level.to_string())),
    }
}

/// Install the global subscriber writing to `file`.
///
/// Returns `None` when no file is given; logging stays disabled. The returned
/// guard flushes buffered records when dropped and must outlive the program's
/// logging.
pub fn init(level: &str, file: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    use tracing_subscriber::prelude::*;

    let Some(file) = file else {
        return Ok(None);
    };

    let file_name = file
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(file.to_path_buf()))?;
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let env_filter = build_filter(level)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_disables_logging() {
        assert!(init("info", None).unwrap().is_none());
    }

    #[test]
    fn test_bad_path_rejected() {
        assert!(matches!(
            init("info", Some(Path::new("/"))),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(build_filter("debug").is_ok());
            assert!(build_filter("ascii_preview=trace,warn").is_ok());
        }
    }
}
