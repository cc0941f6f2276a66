//! Lazy, line-by-line event reading.

use std::io::{BufRead, Lines};

use anyhow::{Context, Result};

use super::{parse_header, Event, Header};

/// Iterator over the events of an asciicast v3 stream.
///
/// The header is consumed by [`EventReader::new`]; events are parsed one
/// line at a time as the iterator advances. Blank lines are skipped.
pub struct EventReader<R> {
    lines: Lines<R>,
    line_num: usize,
}

impl<R: BufRead> EventReader<R> {
    /// Read the header and return it with a reader positioned at the first event.
    pub fn new(reader: R) -> Result<(Header, Self)> {
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .context("File is empty")?
            .context("Failed to read header line")?;
        let header = parse_header(&header_line)?;

        Ok((header, Self { lines, line_num: 1 }))
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;
            let line_num = self.line_num;

            let line = match line.with_context(|| format!("Failed to read line {}", line_num)) {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            if line.trim().is_empty() {
                continue;
            }

            return Some(
                Event::from_json(&line)
                    .with_context(|| format!("Failed to parse event on line {}", line_num)),
            );
        }
    }
}
