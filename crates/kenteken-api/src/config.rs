//! Configuration for the kenteken service.

use crate::api::DEFAULT_MAX_BODY_BYTES;
use crate::store::DuplicateStrategy;
use anyhow::{Context, Result};
use config::FileFormat;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "KENTEKEN_CONFIG";

/// Config file used when `KENTEKEN_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Service configuration.
///
/// Keys match the JSON config file (`MYSQL_HOST`, ...). Lowercase spellings
/// are accepted as well.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// MySQL server host
    #[serde(rename = "MYSQL_HOST", alias = "mysql_host")]
    pub mysql_host: String,

    /// MySQL user
    #[serde(rename = "MYSQL_USER", alias = "mysql_user")]
    pub mysql_user: String,

    /// MySQL password
    #[serde(rename = "MYSQL_PASSWORD", alias = "mysql_password")]
    pub mysql_password: SecretString,

    /// MySQL database name
    #[serde(rename = "MYSQL_DATABASE", alias = "mysql_database")]
    pub mysql_database: String,

    /// MySQL port, kept as the string the config file carries
    #[serde(rename = "MYSQL_PORT", alias = "mysql_port")]
    pub mysql_port: String,

    /// HTTP listen address
    #[serde(rename = "LISTEN_ADDR", alias = "listen_addr", default = "default_listen_addr")]
    pub listen_addr: String,

    /// HTTP port
    #[serde(rename = "HTTP_PORT", alias = "http_port", default = "default_http_port")]
    pub http_port: u16,

    /// Log file, opened in append mode
    #[serde(rename = "LOG_FILE", alias = "log_file", default = "default_log_file")]
    pub log_file: PathBuf,

    /// Log level, overridden by `RUST_LOG`
    #[serde(rename = "LOG_LEVEL", alias = "log_level", default = "default_log_level")]
    pub log_level: String,

    /// Log line format
    #[serde(rename = "LOG_FORMAT", alias = "log_format", default)]
    pub log_format: LogFormat,

    /// Duplicate detection strategy for the MySQL store
    #[serde(rename = "DUPLICATE_STRATEGY", alias = "duplicate_strategy", default)]
    pub duplicate_strategy: DuplicateStrategy,

    /// Upper bound on request body size
    #[serde(rename = "MAX_BODY_BYTES", alias = "max_body_bytes", default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_http_port() -> u16 {
    8080
}

fn default_log_file() -> PathBuf {
    PathBuf::from("trace.log")
}

fn default_log_level() -> String {
    "info".into()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Config {
    /// Load configuration from the file named by `KENTEKEN_CONFIG`, or `config.json`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_file(&path)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).format(FileFormat::Json))
            .build()
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from an in-memory JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(json, FileFormat::Json))
            .build()
            .context("Failed to parse configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
