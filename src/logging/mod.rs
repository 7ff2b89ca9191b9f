//! Logging setup.
//!
//! [`init`] installs a `tracing` subscriber writing to an optional console
//! layer and to `<dir>/handlerkit.log`, rotated by size through
//! [`RotatingFileWriter`]. The returned [`LoggingHandle`] owns the background
//! writer; dropping it flushes and stops file logging, so the server keeps it
//! for its whole lifetime.

mod rotating;

pub use rotating::RotatingFileWriter;

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "handlerkit.log";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Parameters for [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: PathBuf,
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub max_size_mb: u64,
    pub backup_count: usize,
    /// Mirror log lines to stdout.
    pub console: bool,
}

impl LogSettings {
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }
}

/// Keeps the non-blocking file writer alive.
#[derive(Debug)]
pub struct LoggingHandle {
    file: PathBuf,
    _guard: WorkerGuard,
}

impl LoggingHandle {
    pub fn file(&self) -> &PathBuf {
        &self.file
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::Open`] if the log file cannot be created and
/// [`LoggingError::Install`] if a subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<LoggingHandle, LoggingError> {
    let file = settings.file_path();
    let writer = RotatingFileWriter::new(
        &file,
        settings.max_size_mb.saturating_mul(BYTES_PER_MB),
        settings.backup_count,
    )
    .map_err(|source| LoggingError::Open {
        path: file.clone(),
        source,
    })?;

    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let console_layer = settings
        .console
        .then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()?;

    Ok(LoggingHandle {
        file,
        _guard: guard,
    })
}
