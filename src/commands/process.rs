//! Batch processing of recordings into JSON artifacts

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use castdoc::render::Theme;
use castdoc::{process_batch, JsonFileSink};

use super::load_config;

#[cfg(not(tarpaulin_include))]
pub fn handle(
    files: &[PathBuf],
    out_dir: Option<PathBuf>,
    pretty: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let theme = Theme::detect();

    let directory = out_dir
        .or_else(|| config.output.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let sink = JsonFileSink::new(directory).pretty(pretty || config.output.pretty);

    let outcomes = process_batch(files, &config, &sink);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(artifact_path) => println!(
                "{} {} -> {}",
                theme.success_text("✓"),
                outcome.path.display(),
                artifact_path.display()
            ),
            Err(e) => {
                failed += 1;
                eprintln!(
                    "{} {}: {}",
                    theme.error_text("✗"),
                    outcome.path.display(),
                    e
                );
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} sessions failed", failed, outcomes.len());
    }
    Ok(())
}
