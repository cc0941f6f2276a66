//! Terminal emulator tests.
//!
//! Organized by handler category:
//! - cursor_tests: Cursor movement
//! - scroll_tests: Scroll region behavior and scrollback capture
//! - editing_tests: Erase/delete operations
//! - style_tests: SGR color/attribute parsing
//! - integration_tests: Modes, resize and full sequence replay

mod editing_tests;

use super::TerminalBuffer;

pub(super) fn term(width: usize, height: usize) -> TerminalBuffer {
    TerminalBuffer::new(width, height)
}

pub(super) fn row_text(t: &TerminalBuffer, row: usize) -> String {
    t.view_lines()[row].text()
}
