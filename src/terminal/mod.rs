//! Virtual terminal emulator module.
//!
//! Provides a VTE-based terminal buffer for replaying asciicast output.
//! Handles ANSI escape sequences and maintains terminal state, including a
//! bounded scrollback of lines that scrolled off the primary screen.
//!
//! The replayer only talks to the [`Emulator`] trait; [`TerminalBuffer`]
//! is the implementation shipped with the crate.

mod buffer;
mod emulator;
pub(crate) mod handlers;
mod performer;
mod screen;
mod types;

#[cfg(test)]
mod tests;

pub use buffer::TerminalBuffer;
pub use emulator::Emulator;
pub use types::{Cell, CellStyle, Color, Line, Span, SpanColor, ViewportSnapshot};
