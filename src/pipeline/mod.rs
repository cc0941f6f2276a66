//! Session processing pipeline.
//!
//! Runs replay, deduplication and section detection for one session and
//! packages the result as a [`SessionArtifact`]. Each run owns its own
//! terminal, index and document; nothing is shared between runs, so
//! sessions can be processed in parallel ([`process_batch`]).

mod sink;
mod status;

use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::asciicast::{AsciicastFile, Event, EventReader, Header, Marker};
use crate::config::Config;
use crate::dedup::{CleanDocument, DedupStats, Deduplicator, PositionMap};
use crate::replay::{ReplayError, ReplayStats, Replayer};
use crate::sections::{DetectionInput, DetectionStatus, Section, SectionDetector};

pub use sink::{sanitize_session_id, ArtifactSink, JsonFileSink, SinkError};
pub use status::{ProcessingStatus, StatusHandle};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read session {session}: {error:#}")]
    Source {
        session: String,
        error: anyhow::Error,
    },

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Session metadata carried into the artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub cols: usize,
    pub rows: usize,
    /// Unix timestamp of the recording, when the header has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<i64>,
    /// Sum of event intervals in seconds
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactStats {
    pub replay: ReplayStats,
    pub dedup: DedupStats,
}

/// Everything produced for one session.
///
/// Contains nothing that depends on when or where it was produced, so
/// processing the same file twice yields the same artifact.
#[derive(Debug, Clone, Serialize)]
pub struct SessionArtifact {
    pub session: SessionInfo,
    pub clean_document: CleanDocument,
    pub sections: Vec<Section>,
    pub event_count: usize,
    pub detection_status: DetectionStatus,
    pub markers: Vec<Marker>,
    pub position_map: PositionMap,
    pub stats: ArtifactStats,
}

/// One configured pipeline with an observable status.
pub struct Pipeline {
    config: Config,
    status: StatusHandle,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            status: StatusHandle::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle for watching this pipeline's status from elsewhere.
    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Process a `.cast` file. The session id is the file stem.
    pub fn run(&self, path: &Path) -> Result<SessionArtifact, PipelineError> {
        self.tracked(|| self.process_file(path, &session_id_for(path)))
    }

    /// Process a session read from `reader`.
    pub fn run_reader<R: BufRead>(
        &self,
        session: &str,
        reader: R,
    ) -> Result<SessionArtifact, PipelineError> {
        self.tracked(|| {
            let (header, events) =
                EventReader::new(reader).map_err(|error| PipelineError::Source {
                    session: session.to_string(),
                    error,
                })?;
            self.execute(session, &header, events)
        })
    }

    /// Process already-parsed events.
    pub fn run_events(
        &self,
        session: &str,
        header: &Header,
        events: &[Event],
    ) -> Result<SessionArtifact, PipelineError> {
        self.tracked(|| self.execute(session, header, events.iter().cloned().map(Ok)))
    }

    /// Process a file and hand the artifact to `sink`.
    pub fn run_to_sink<S: ArtifactSink + ?Sized>(
        &self,
        path: &Path,
        sink: &S,
    ) -> Result<PathBuf, PipelineError> {
        self.run_session_to_sink(path, &session_id_for(path), sink)
    }

    /// Process a file under an explicit session id and hand the artifact to `sink`.
    pub fn run_session_to_sink<S: ArtifactSink + ?Sized>(
        &self,
        path: &Path,
        session: &str,
        sink: &S,
    ) -> Result<PathBuf, PipelineError> {
        self.tracked(|| {
            let artifact = self.process_file(path, session)?;
            Ok(sink.store(&artifact)?)
        })
    }

    fn process_file(&self, path: &Path, session: &str) -> Result<SessionArtifact, PipelineError> {
        let (header, events) = AsciicastFile::open(path).map_err(|error| PipelineError::Source {
            session: session.to_string(),
            error,
        })?;
        self.execute(session, &header, events)
    }

    fn tracked<T>(
        &self,
        run: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        self.status.set(ProcessingStatus::Processing);
        let result = run();
        match &result {
            Ok(_) => self.status.set(ProcessingStatus::Completed),
            Err(e) => {
                tracing::warn!(error = %e, "pipeline failed");
                self.status.set(ProcessingStatus::Failed(e.to_string()));
            }
        }
        result
    }

    fn execute<I>(
        &self,
        session: &str,
        header: &Header,
        events: I,
    ) -> Result<SessionArtifact, PipelineError>
    where
        I: IntoIterator<Item = anyhow::Result<Event>>,
    {
        let replay = Replayer::for_header(header, &self.config.replay).replay_stream(events)?;

        let anchors = replay.anchors();
        let dedup =
            Deduplicator::new(&self.config.dedup).deduplicate(&replay.raw_lines, &anchors);

        let detector = SectionDetector::new(&self.config.sections);
        let detection = detector.detect(&DetectionInput {
            document: &dedup.document,
            position_map: &dedup.position_map,
            markers: &replay.markers,
            marker_snapshots: &replay.marker_snapshots,
            final_snapshot: &replay.final_snapshot,
            event_count: replay.event_count,
            had_output: replay.had_output(),
            title: header.title.as_deref(),
        });

        let (cols, rows) = header.size();
        tracing::info!(
            session,
            events = replay.event_count,
            raw_lines = replay.raw_lines.len(),
            clean_lines = dedup.document.len(),
            sections = detection.sections.len(),
            "processed session"
        );

        Ok(SessionArtifact {
            session: SessionInfo {
                id: session.to_string(),
                title: header.title.clone(),
                command: header.command.clone(),
                cols,
                rows,
                recorded_at: header.timestamp,
                duration: replay.duration,
            },
            clean_document: dedup.document,
            sections: detection.sections,
            event_count: replay.event_count,
            detection_status: detection.status,
            markers: replay.markers,
            position_map: dedup.position_map,
            stats: ArtifactStats {
                replay: replay.stats,
                dedup: dedup.stats,
            },
        })
    }
}

/// Session id derived from a file path: the file stem, or `session`.
pub fn session_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string())
}

/// Session ids for a batch, one per path, never sharing an artifact name.
///
/// Names are compared after sanitizing and case folding, which is how they
/// land on disk. A later duplicate gets `-2`, `-3`, ... appended.
pub fn batch_session_ids(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let base = session_id_for(path);
            let mut id = base.clone();
            let mut n = 1;
            while !taken.insert(sanitize_session_id(&id).to_ascii_lowercase()) {
                n += 1;
                id = format!("{base}-{n}");
            }
            id
        })
        .collect()
}

/// Result of one session in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub status: ProcessingStatus,
    /// Where the artifact was stored, on success
    pub result: Result<PathBuf, PipelineError>,
}

/// Process independent sessions in parallel, one pipeline per session.
///
/// Outcomes come back in input order; one failing session does not stop
/// the others. Session ids come from [`batch_session_ids`].
pub fn process_batch<S: ArtifactSink + ?Sized>(
    paths: &[PathBuf],
    config: &Config,
    sink: &S,
) -> Vec<BatchOutcome> {
    let ids = batch_session_ids(paths);
    paths
        .par_iter()
        .zip(ids.par_iter())
        .map(|(path, id)| {
            let pipeline = Pipeline::new(config.clone());
            let result = pipeline.run_session_to_sink(path, id, sink);
            BatchOutcome {
                path: path.clone(),
                status: pipeline.status().get(),
                result,
            }
        })
        .collect()
}
