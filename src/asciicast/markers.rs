//! Marker collection.
//!
//! Markers are special events in the cast file that label points in the
//! recording. They are derived once from the event stream and never change.

use serde::{Deserialize, Serialize};

use super::Event;

/// A marker event with its absolute position in the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Cumulative time when the marker occurs
    pub time: f64,
    /// Marker label (from the cast file)
    pub label: String,
    /// Index of the marker event in the event stream
    pub event_index: usize,
}

/// Collect markers from a list of events with their cumulative times.
pub fn collect_markers(events: &[Event]) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut cumulative = 0.0f64;

    for (event_index, event) in events.iter().enumerate() {
        cumulative += event.time;
        if event.is_marker() {
            markers.push(Marker {
                time: cumulative,
                label: event.data.clone(),
                event_index,
            });
        }
    }

    markers
}
