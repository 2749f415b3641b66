//! Logging setup: an stderr layer plus an optional file layer
//!
//! Log lines never touch stdout, which carries the command's own output.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber described by `options`.
///
/// A no-op when a subscriber is already installed, so demos and tests can call it freely.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&options.level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {e}", options.level)))?;

    let stderr = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .with_ansi(options.color);

    let file = match options.file.as_deref() {
        Some(path) => Some(
            fmt::layer()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(false)
                .with_writer(file_writer(path, options.rotation)?),
        ),
        None => None,
    };

    Registry::default()
        .with(stderr)
        .with(file)
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn file_writer(path: &Path, rotation: Option<LogRotation>) -> Result<NonBlocking> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::Config(format!("Log file path '{}' has no filename", path.display()))
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let rotation = match rotation {
        Some(LogRotation::Hourly) => Rotation::HOURLY,
        Some(LogRotation::Daily) => Rotation::DAILY,
        None => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| Error::Config(format!("Failed to open log file {}: {e}", path.display())))?;

    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(appender);
    // Dropping the guard would stop the background writer
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_log_file_keeps_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("linkqr.log");
        file_writer(&path, None).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_log_path_needs_a_filename() {
        let result = file_writer(Path::new("/"), None);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
