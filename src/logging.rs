//! Structured logging setup.
//!
//! The library itself only emits `tracing` events; binaries and tests decide
//! whether and how to collect them by calling [`init_logging`] or
//! [`init_logging_with_config`].
//!
//! ## Environment Variables
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `RUST_LOG` | any `EnvFilter` directive | unset |
//! | `RESTMODELS_LOG_LEVEL` | `trace`, `debug`, `info`, `warn`, `error` | `info` |
//! | `RESTMODELS_LOG_FORMAT` | `json`, `pretty` | `json` |
//! | `RESTMODELS_LOG_TARGET_FILTER` | comma-separated directives | unset |
//! | `RESTMODELS_LOG_INCLUDE_LOCATION` | `true`, `false` | `false` |
//!
//! `RUST_LOG` wins over `RESTMODELS_LOG_LEVEL` when both are set.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for humans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra `EnvFilter` directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("RESTMODELS_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("RESTMODELS_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: env::var("RESTMODELS_LOG_TARGET_FILTER").ok(),
            include_location: env::var("RESTMODELS_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Human-friendly configuration for local runs
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Build the filter: `RUST_LOG` first, then the configured level, plus
    /// any extra target directives.
    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Initialise logging from the environment.
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())
}

/// Install a global subscriber for `config`.
///
/// Fails if a global subscriber is already installed.
///
/// ```rust,no_run
/// use restmodels::logging::{init_logging_with_config, LogConfig};
///
/// let config = LogConfig::from_env();
/// init_logging_with_config(&config).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}
