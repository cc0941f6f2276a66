//! Subcommand handlers.

pub mod config;
pub mod info;
pub mod process;
pub mod sections;
pub mod show;

use std::path::Path;

use anyhow::{Context, Result};
use castdoc::Config;

/// Load the config named by `--config`, or the default one.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load()?),
    }
}

/// `1h 2m 3s` style duration, rounded to whole seconds.
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds.max(0.0).round() as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
