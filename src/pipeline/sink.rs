//! Artifact persistence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use deunicode::deunicode;

use super::SessionArtifact;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for finished artifacts.
pub trait ArtifactSink: Send + Sync {
    /// Persist `artifact`, returning where it went.
    fn store(&self, artifact: &SessionArtifact) -> Result<PathBuf, SinkError>;
}

/// Writes `<session-id>.json` files into a directory.
///
/// Files are written to a temporary name and renamed into place, so a
/// reader never sees a partial artifact and a re-run replaces the old one.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the artifact for `session_id` is written to.
    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.directory
            .join(format!("{}.json", sanitize_session_id(session_id)))
    }
}

impl ArtifactSink for JsonFileSink {
    fn store(&self, artifact: &SessionArtifact) -> Result<PathBuf, SinkError> {
        let json = if self.pretty {
            serde_json::to_vec_pretty(artifact)?
        } else {
            serde_json::to_vec(artifact)?
        };

        fs::create_dir_all(&self.directory).map_err(|source| SinkError::Io {
            path: self.directory.clone(),
            source,
        })?;
        let target = self.path_for(&artifact.session.id);
        atomic_write(&target, &json).map_err(|source| SinkError::Io {
            path: target.clone(),
            source,
        })?;

        tracing::debug!(path = %target.display(), bytes = json.len(), "stored artifact");
        Ok(target)
    }
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Hidden temp file next to `target`, unique per process and per write.
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
}

fn atomic_write(target: &Path, content: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_path_for(target);
    let result = write_synced(&temp_path, content).and_then(|()| fs::rename(&temp_path, target));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const FALLBACK_ID: &str = "session";

/// Leaves room for the extension within the usual 255 byte limit.
const MAX_ID_LENGTH: usize = 200;

/// Turn a session id into a filesystem-safe file stem.
///
/// Transliterates to ASCII, maps whitespace to `-`, drops anything that is
/// not alphanumeric, `_`, `.` or `-`, collapses hyphens and trims the ends.
/// Windows device names get a `_` prefix; an empty result becomes `session`.
pub fn sanitize_session_id(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;
    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_hyphen = false;
        }
    }

    let trimmed: String = result
        .trim_matches(|c| c == '.' || c == '-')
        .chars()
        .take(MAX_ID_LENGTH)
        .collect();

    let base = trimmed.split('.').next().unwrap_or_default().to_uppercase();
    if WINDOWS_RESERVED.contains(&base.as_str()) {
        format!("_{}", trimmed)
    } else if trimmed.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        trimmed
    }
}
