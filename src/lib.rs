//! castdoc - clean, sectioned documents from terminal recordings
//!
//! A recording is processed in four stages:
//!
//! 1. [`replay`] feeds the events through a virtual [`terminal`] and
//!    captures the raw scrollback plus the points where the screen was
//!    cleared.
//! 2. [`dedup`] drops the blocks that full-screen redraws repeat in that
//!    scrollback and keeps a map from raw positions to clean ones.
//! 3. [`sections`] splits the clean document at markers, or at detected
//!    command boundaries when the recording has none.
//! 4. [`pipeline`] ties the stages together per session and stores the
//!    resulting [`SessionArtifact`].

pub mod asciicast;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod replay;
pub mod sections;
pub mod terminal;

pub use config::Config;
pub use dedup::{CleanDocument, Deduplicator, PositionMap};
pub use pipeline::{
    process_batch, JsonFileSink, Pipeline, PipelineError, ProcessingStatus, SessionArtifact,
};
pub use replay::{ReplayOutput, Replayer};
pub use sections::{DetectionStatus, Section, SectionDetector};
