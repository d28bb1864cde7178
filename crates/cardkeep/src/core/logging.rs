//! Logging infrastructure
//!
//! Structured logging through the `tracing` crate. Logs always go to stderr
//! so they never mix with the card output on stdout.
//!
//! # Usage
//!
//! ```rust
//! use cardkeep::core::logging::init_logging;
//!
//! // Defaults: warn level, compact format
//! let _ = init_logging(None, None);
//!
//! // Or explicit
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! # Log Levels
//!
//! - `trace`: file writes
//! - `debug`: loads, saves and recoveries from unusable collection files
//! - `info`: one event per completed mutation
//! - `warn`: ignored configuration and corrupt collection files (default)
//! - `error`: error messages
//!
//! # Log Formats
//!
//! - `compact`: Single-line format (default)
//! - `pretty`: Multi-line format with colors
//! - `json`: JSON format for log aggregation
//!
//! # Environment Variables
//!
//! - `CARDKEEP_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard tracing-subscriber filter, also accepts per-module
//!   directives such as `cardkeep::core::store=trace`
//! - `CARDKEEP_LOG_FORMAT`: log format (compact|pretty|json)

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable for the log level
pub const LOG_LEVEL_ENV: &str = "CARDKEEP_LOG_LEVEL";

/// Environment variable for the log format
pub const LOG_FORMAT_ENV: &str = "CARDKEEP_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "warn";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Initialize the global tracing subscriber
///
/// * `level` - log level or filter directive. If None, uses
///   `CARDKEEP_LOG_LEVEL`, then `RUST_LOG`, then `warn`.
/// * `format` - compact|pretty|json. If None, uses `CARDKEEP_LOG_FORMAT`,
///   then `compact`.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    };

    let format =
        LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}
