//! Logging Initialization
//!
//! Structured logging for the wizard and its terminal front end:
//! - JSON lines in a daily rolling file under the data directory
//! - No stdout layer: the terminal belongs to ratatui while the app runs
//! - `log` crate events redirected into `tracing`

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "stepform";

/// Resolve the log directory: configured override, else `<data_dir>/stepform/logs`.
pub fn log_dir(config: &LoggingConfig) -> PathBuf {
    config.log_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .map(|d| d.join("stepform").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    })
}

fn file_appender(log_dir: &Path, max_files: usize) -> RollingFileAppender {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(max_files.max(1))
        .build(log_dir)
        .unwrap_or_else(|e| {
            eprintln!("Failed to build rolling log appender: {}", e);
            tracing_appender::rolling::daily(log_dir, format!("{LOG_FILE_PREFIX}.log"))
        })
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Initialize logging for TUI mode: a JSON file layer only, so the terminal
/// is not corrupted while ratatui owns it.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init_tui(config: &LoggingConfig) -> WorkerGuard {
    let log_dir = log_dir(config);
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let (non_blocking, guard) =
        tracing_appender::non_blocking(file_appender(&log_dir, config.max_files));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter(config));

    // try_init so a second call (tests, embedding hosts) is harmless
    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }

    // Usually already installed by the subscriber's `tracing-log` feature.
    let _ = tracing_log::LogTracer::init();

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir
    );

    guard
}
