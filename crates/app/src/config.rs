//! Client configuration, from CLI arguments and environment.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Connection and storage settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Base URL of the ordering API.
    #[arg(long, env = "SAGRA_API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Directory for durable client state (cart, token, snapshots).
    #[arg(long, env = "SAGRA_DATA_DIR", default_value = ".sagra")]
    pub data_dir: PathBuf,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Logging output settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log filter when `RUST_LOG` is not set.
    #[arg(long, env = "SAGRA_LOG", default_value = "info")]
    pub log_level: String,

    /// Log line format.
    #[arg(long, env = "SAGRA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Supported log line formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-oriented single-line output.
    Compact,
    /// Structured JSON lines.
    Json,
}
