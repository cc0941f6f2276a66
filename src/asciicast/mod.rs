// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by castdoc

//! asciicast v3 format parser
//!
//! Reference: https://docs.asciinema.org/manual/asciicast/v3/
//!
//! This module provides types and functions for reading asciicast v3
//! recordings, either fully into memory ([`AsciicastFile`]) or lazily,
//! one event at a time ([`EventReader`]).

mod markers;
mod reader;

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub use markers::{collect_markers, Marker};
pub use reader::EventReader;

/// Terminal size used when the header carries none.
pub const DEFAULT_SIZE: (usize, usize) = (80, 24);

/// asciicast v3 header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<TermInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
}

impl Header {
    /// Header for an `cols`x`rows` v3 recording.
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            version: 3,
            term: Some(TermInfo {
                cols: Some(cols),
                rows: Some(rows),
                term_type: None,
            }),
            ..Default::default()
        }
    }

    /// Initial terminal size as `(cols, rows)`.
    ///
    /// Prefers `term.cols/rows`, then `width/height`, then 80x24.
    pub fn size(&self) -> (usize, usize) {
        let term = self.term.as_ref();
        let cols = term.and_then(|t| t.cols).or(self.width);
        let rows = term.and_then(|t| t.rows).or(self.height);
        (
            cols.map(|c| c as usize).unwrap_or(DEFAULT_SIZE.0),
            rows.map(|r| r as usize).unwrap_or(DEFAULT_SIZE.1),
        )
    }
}

/// Terminal description from the header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub term_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// `o`: bytes written to the terminal
    Output,
    /// `i`: keyboard input
    Input,
    /// `m`: user marker
    Marker,
    /// `r`: terminal resize, payload `COLSxROWS`
    Resize,
    /// `x`: process exit status
    Exit,
}

impl EventType {
    const CODES: [(&'static str, EventType); 5] = [
        ("o", EventType::Output),
        ("i", EventType::Input),
        ("m", EventType::Marker),
        ("r", EventType::Resize),
        ("x", EventType::Exit),
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
    }

    pub fn code(self) -> &'static str {
        Self::CODES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("?", |(c, _)| *c)
    }
}

/// One event line: `[interval, code, data]`.
#[derive(Deserialize)]
struct RawEvent(f64, String, serde_json::Value);

/// A recorded event. `time` is the interval since the previous event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: f64,
    pub event_type: EventType,
    pub data: String,
}

impl Event {
    pub fn new(time: f64, event_type: EventType, data: impl Into<String>) -> Self {
        Self {
            time,
            event_type,
            data: data.into(),
        }
    }

    pub fn output(time: f64, data: impl Into<String>) -> Self {
        Self::new(time, EventType::Output, data)
    }

    pub fn marker(time: f64, label: impl Into<String>) -> Self {
        Self::new(time, EventType::Marker, label)
    }

    pub fn resize(time: f64, cols: u16, rows: u16) -> Self {
        Self::new(time, EventType::Resize, format!("{}x{}", cols, rows))
    }

    pub fn is_output(&self) -> bool {
        self.event_type == EventType::Output
    }

    pub fn is_marker(&self) -> bool {
        self.event_type == EventType::Marker
    }

    /// `(cols, rows)` of a resize event; `None` for other events or a bad payload.
    pub fn parse_resize(&self) -> Option<(u16, u16)> {
        if self.event_type != EventType::Resize {
            return None;
        }
        let (cols, rows) = self.data.split_once('x')?;
        let size = (cols.trim().parse::<u16>().ok()?, rows.trim().parse::<u16>().ok()?);
        (size.0 > 0 && size.1 > 0).then_some(size)
    }

    /// Parse one event line.
    pub fn from_json(line: &str) -> Result<Self> {
        let RawEvent(time, code, data) =
            serde_json::from_str(line).context("Event must be a [time, code, data] array")?;
        if !time.is_finite() || time < 0.0 {
            bail!("Event time must be a non-negative number (got {})", time);
        }
        let event_type =
            EventType::from_code(&code).with_context(|| format!("Unknown event type: {}", code))?;

        // Exit statuses are sometimes written as bare numbers.
        let data = match data {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(n) if event_type == EventType::Exit => n.to_string(),
            other => bail!("Event data must be a string (got {})", other),
        };

        Ok(Self::new(time, event_type, data))
    }
}

/// A recording read fully into memory.
#[derive(Debug, Clone)]
pub struct AsciicastFile {
    pub header: Header,
    pub events: Vec<Event>,
}

impl AsciicastFile {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, events) = Self::open(path)?;
        Ok(Self {
            header,
            events: events.collect::<Result<_>>()?,
        })
    }

    /// Open a recording for lazy reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Header, EventReader<BufReader<fs::File>>)> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        EventReader::new(BufReader::new(file))
    }

    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Self> {
        let (header, events) = EventReader::new(reader)?;
        Ok(Self {
            header,
            events: events.collect::<Result<_>>()?,
        })
    }

    pub fn parse_str(content: &str) -> Result<Self> {
        Self::parse_reader(content.as_bytes())
    }

    pub fn markers(&self) -> Vec<Marker> {
        collect_markers(&self.events)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_output())
    }

    /// Absolute time of each event.
    pub fn cumulative_times(&self) -> Vec<f64> {
        self.events
            .iter()
            .scan(0.0, |elapsed, event| {
                *elapsed += event.time;
                Some(*elapsed)
            })
            .collect()
    }

    pub fn duration(&self) -> f64 {
        self.events.iter().map(|e| e.time).sum()
    }
}

/// Parse the header line, accepting only version 3.
pub(crate) fn parse_header(line: &str) -> Result<Header> {
    let header: Header = serde_json::from_str(line).context("Failed to parse header")?;
    if header.version != 3 {
        bail!(
            "Only asciicast v3 recordings are supported (got version {})",
            header.version
        );
    }
    Ok(header)
}
