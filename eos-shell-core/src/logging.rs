//! Logging setup for the shell.
//!
//! Built on the `tracing` ecosystem: a console layer (text or JSON) and an
//! optional daily-rolling file layer written through a non-blocking
//! `tracing-appender` worker.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs a minimal `stderr` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Meant for tests and for reporting configuration errors before the real
/// configuration is known. Calling it when a subscriber is already installed
/// does nothing.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn level_filter(level: &str) -> Result<Level, LoggingError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        invalid => Err(LoggingError::FilterError(format!("Invalid log level in config: {}", invalid))),
    }
}

/// Builds the file layer and its worker guard, creating the parent directory.
fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let parent = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    utils::fs::ensure_dir_exists(parent)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InitializationError(format!("Log path {:?} has no file name", log_path)))?;

    let file_appender = tracing_appender::rolling::daily(parent, file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = match format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .boxed(),
        _ => fmt::layer().with_writer(non_blocking_writer).with_ansi(false).boxed(),
    };
    Ok((layer, guard))
}

/// Keeps the file writer alive so buffered lines get flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, a subscriber that is already installed is not an
/// error; the previous one stays active and only the file worker guard is
/// swapped.
///
/// # Errors
///
/// Returns [`CoreError::LoggingInitialization`] for an invalid level, an
/// unusable log path, or (on first setup) when a global subscriber exists.
pub fn initialize_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = level_filter(&config.level)?;

    let stdout_layer: BoxedLayer = match config.format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed(),
        _ => fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed(),
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut new_file_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        new_file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    // Dropping the previous guard flushes the old file writer.
    let mut guard_slot = LOG_WORKER_GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard_slot = new_file_guard;
    drop(guard_slot);

    match result {
        Ok(()) => {
            tracing::debug!(level = %level, format = %config.format, "Logging initialised");
            Ok(())
        }
        Err(e) if is_reload => {
            tracing::info!("Logging reload requested; keeping the installed subscriber: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationError(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
