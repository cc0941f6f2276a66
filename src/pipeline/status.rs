//! Processing status shared with callers.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    /// Carries the error that stopped the run
    Failed(String),
}

impl ProcessingStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessingStatus::Failed(_))
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Cloneable view of a pipeline's status, readable while a run is in progress.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<RwLock<ProcessingStatus>>,
}

impl StatusHandle {
    pub fn get(&self) -> ProcessingStatus {
        match self.inner.read() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn set(&self, status: ProcessingStatus) {
        match self.inner.write() {
            Ok(mut guard) => *guard = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = StatusHandle::default();
        let observer = handle.clone();
        assert_eq!(observer.get(), ProcessingStatus::Pending);

        handle.set(ProcessingStatus::Processing);
        assert_eq!(observer.get(), ProcessingStatus::Processing);
        assert!(!observer.get().is_finished());

        handle.set(ProcessingStatus::Failed("boom".into()));
        assert!(observer.get().is_failed());
        assert_eq!(observer.get().to_string(), "failed: boom");
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(ProcessingStatus::Failed("bad".into())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["reason"], "bad");
        let json = serde_json::to_value(ProcessingStatus::Completed).unwrap();
        assert_eq!(json["state"], "completed");
    }
}
