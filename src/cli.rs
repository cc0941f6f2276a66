//! Command-line interface definitions.
//!
//! Lives in the library so the xtask can build man pages from it.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::logging::LogLevel;

#[cfg(not(feature = "release"))]
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "castdoc")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Turn redraw-heavy asciicast recordings into clean, sectioned documents")]
#[command(long_about = "castdoc replays asciicast v3 recordings through a virtual terminal, \
removes the content that full-screen redraws repeat in the scrollback, and splits the \
result into sections from markers or detected command boundaries.")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log verbosity (overrides CASTDOC_LOG and RUST_LOG)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process recordings into JSON artifacts
    #[command(long_about = "Process one or more recordings in parallel. Each session is \
written to <OUT_DIR>/<session>.json. Sessions that fail are reported and the \
command exits non-zero, but the others are still written.")]
    Process {
        /// Recordings to process
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Directory for artifacts (default: output.directory or the current directory)
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the clean document of a recording
    Show {
        /// Recording to show
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Only print the section with this id
        #[arg(short, long, value_name = "ID")]
        section: Option<usize>,
    },

    /// List the sections of a recording
    Sections {
        /// Recording to inspect
        file: PathBuf,

        /// Print the sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recording metadata
    Info {
        /// Recording to inspect
        file: PathBuf,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Text with the recorded colors and attributes
    Ansi,
    /// The full artifact as JSON
    Json,
}
