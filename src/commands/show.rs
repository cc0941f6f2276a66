//! Printing the clean document of a recording

use std::path::Path;

use anyhow::{Context, Result};
use castdoc::cli::OutputFormat;
use castdoc::render::{
    render_artifact, render_lines, section_heading, section_lines, LineStyle, Theme,
};
use castdoc::Pipeline;

use super::load_config;

#[cfg(not(tarpaulin_include))]
pub fn handle(
    file: &Path,
    format: OutputFormat,
    section: Option<usize>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let artifact = Pipeline::new(config).run(file)?;

    let style = match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&artifact)?);
            return Ok(());
        }
        OutputFormat::Text => LineStyle::Plain,
        OutputFormat::Ansi => LineStyle::Ansi,
    };
    let theme = if style == LineStyle::Ansi {
        Theme::default()
    } else {
        Theme::detect()
    };

    let output = match section {
        Some(id) => {
            let section = artifact
                .sections
                .iter()
                .find(|s| s.id == id)
                .with_context(|| {
                    format!(
                        "No section {} in {} (it has {})",
                        id,
                        file.display(),
                        artifact.sections.len()
                    )
                })?;
            format!(
                "{}\n{}",
                section_heading(section, &theme),
                render_lines(section_lines(&artifact, section), style)
            )
        }
        None => render_artifact(&artifact, style, &theme),
    };
    print!("{}", output);
    Ok(())
}
