//! Config subcommands handler

use std::path::Path;

use anyhow::Result;
use castdoc::Config;

use super::load_config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print where the config is read from, and whether it exists.
#[cfg(not(tarpaulin_include))]
pub fn handle_path(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not found, using defaults)", path.display());
    }
    Ok(())
}
