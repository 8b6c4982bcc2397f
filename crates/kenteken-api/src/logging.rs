//! Process-wide log sink.

use crate::config::{Config, LogFormat};
use crate::error::StartupError;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Open the log file for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File, StartupError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(StartupError::LogFile)
}

/// Install the global subscriber writing to the configured log file.
///
/// `RUST_LOG` takes precedence over the configured level. Call once.
pub fn init_logging(config: &Config) -> Result<(), StartupError> {
    let file = open_log_file(&config.log_file)?;
    let writer = Mutex::new(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}
