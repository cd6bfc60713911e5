//! Logging utilities for the Expo service.
//!
//! Every crate logs through the `tracing` macros; this module owns the
//! subscriber setup and a couple of helpers for logging results.

use expo_config::models::LoggingConfig;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "expo.log";

/// Initialize the tracing subscriber at INFO.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_with_level(level: Level) {
    let config = LoggingConfig {
        level: Some(level.to_string()),
        directory: None,
    };
    // No file output, so there is no guard to hold on to.
    let _ = init_with_config(&config);
}

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// When `directory` is set, log lines are additionally written to a daily
/// rolling file there. The returned guard flushes that writer and must be
/// kept alive for the lifetime of the process.
pub fn init_with_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = config.level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init: a subscriber may already be installed (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer)
        .try_init();

    if result.is_ok() {
        info!(
            "Logging initialized at level: {}{}",
            level,
            config
                .directory
                .as_deref()
                .map(|d| format!(" (file output in {})", d))
                .unwrap_or_default()
        );
    }
    guard
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
