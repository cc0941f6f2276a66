//! Configuration loaded from `~/.config/castdoc/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sections::SIGNAL_NAMES;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CASTDOC_CONFIG";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub replay: ReplayConfig,
    pub dedup: DedupConfig,
    pub sections: SectionConfig,
    pub output: OutputConfig,
}

/// Event replay settings.
///
/// The escape sequences are matched literally inside output payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Maximum number of scrollback lines kept by the virtual terminal
    pub scrollback_limit: usize,
    pub alt_screen_enter: Vec<String>,
    pub alt_screen_exit: Vec<String>,
    pub clear_screen: Vec<String>,
    /// Stripped from output before feeding; still marks an epoch boundary
    pub clear_scrollback: Vec<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            scrollback_limit: 1_000_000,
            alt_screen_enter: vec![
                "\x1b[?1049h".to_string(),
                "\x1b[?1047h".to_string(),
                "\x1b[?47h".to_string(),
            ],
            alt_screen_exit: vec![
                "\x1b[?1049l".to_string(),
                "\x1b[?1047l".to_string(),
                "\x1b[?47l".to_string(),
            ],
            clear_screen: vec!["\x1b[2J".to_string()],
            clear_scrollback: vec!["\x1b[3J".to_string()],
        }
    }
}

/// Scrollback deduplication settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Shortest run of lines treated as a redraw of earlier content
    pub min_match: usize,
    /// Most blank lines allowed between a line and its stutter repeat (0 disables)
    pub stutter_max_gap: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            min_match: 3,
            stutter_max_gap: 4,
        }
    }
}

/// How section positions are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateModel {
    /// Line ranges, unless the session left nothing in the clean document
    #[default]
    Auto,
    /// Always clean-document line ranges
    Lines,
    /// Always viewport snapshots
    Snapshot,
}

/// Section detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Detected boundaries closer than this many lines are merged
    pub min_section_lines: usize,
    /// Blank lines needed before the blank-run signal proposes a boundary
    pub blank_run_length: usize,
    pub label_max_chars: usize,
    /// Enabled heuristic signals, by name
    pub signals: Vec<String>,
    pub coordinate_model: CoordinateModel,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            min_section_lines: 5,
            blank_run_length: 3,
            label_max_chars: 80,
            signals: vec![
                "prompt".to_string(),
                "command".to_string(),
                "blank_run".to_string(),
            ],
            coordinate_model: CoordinateModel::Auto,
        }
    }
}

/// Artifact output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default directory for artifacts written by `castdoc process`
    pub directory: Option<PathBuf>,
    /// Pretty-print artifact JSON
    pub pretty: bool,
}

impl Config {
    /// Path of the user config file (`$CASTDOC_CONFIG` wins when set).
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("castdoc").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    /// Load and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dedup.min_match == 0 {
            return Err(ConfigError::Invalid(
                "dedup.min_match must be at least 1".to_string(),
            ));
        }
        let sequence_lists = [
            &self.replay.alt_screen_enter,
            &self.replay.alt_screen_exit,
            &self.replay.clear_screen,
            &self.replay.clear_scrollback,
        ];
        if sequence_lists.iter().any(|list| list.iter().any(String::is_empty)) {
            return Err(ConfigError::Invalid(
                "replay escape sequences must not be empty".to_string(),
            ));
        }
        if let Some(name) = self
            .sections
            .signals
            .iter()
            .find(|name| !SIGNAL_NAMES.contains(&name.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "unknown section signal '{}' (expected one of: {})",
                name,
                SIGNAL_NAMES.join(", ")
            )));
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dedup.min_match, 3);
        assert_eq!(config.sections.coordinate_model, CoordinateModel::Auto);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[dedup]\nmin_match = 5\n").unwrap();
        assert_eq!(config.dedup.min_match, 5);
        assert_eq!(config.dedup.stutter_max_gap, 4);
        assert_eq!(config.replay, ReplayConfig::default());
    }

    #[test]
    fn toml_roundtrip_preserves_escape_sequences() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn zero_min_match_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[dedup]\nmin_match = 0\n").unwrap();
        let err = Config::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_signal_is_rejected() {
        let mut config = Config::default();
        config.sections.signals.push("telepathy".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telepathy"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[dedup\n").unwrap();
        let err = Config::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn coordinate_model_is_lowercase_in_toml() {
        let config: Config =
            toml::from_str("[sections]\ncoordinate_model = \"snapshot\"\n").unwrap();
        assert_eq!(config.sections.coordinate_model, CoordinateModel::Snapshot);
    }
}
