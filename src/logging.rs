//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so stdout stays clean for documents and JSON.
//! The filter comes from `--log-level`, then `CASTDOC_LOG`, then
//! `RUST_LOG`, and defaults to `warn`.

use clap::ValueEnum;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a filter directive for castdoc.
pub const LOG_ENV: &str = "CASTDOC_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Pick the filter for this run.
pub fn build_filter(level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = level {
        return EnvFilter::new(level.as_directive());
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(level: Option<LogLevel>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
