//! castdoc - clean, sectioned documents from terminal recordings

mod commands;

use std::io;

use anyhow::Result;
use castdoc::cli::{Cli, Commands, ConfigCommands};
use clap::{CommandFactory, Parser};

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    castdoc::logging::init(cli.log_level)?;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Process {
            files,
            out_dir,
            pretty,
        } => commands::process::handle(&files, out_dir, pretty, config_path),
        Commands::Show {
            file,
            format,
            section,
        } => commands::show::handle(&file, format, section, config_path),
        Commands::Sections { file, json } => commands::sections::handle(&file, json, config_path),
        Commands::Info { file } => commands::info::handle(&file),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "castdoc", &mut io::stdout());
            Ok(())
        }
    }
}
