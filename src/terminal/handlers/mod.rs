//! Terminal escape sequence handlers.
//!
//! Organized by category:
//! - cursor: Cursor movement and positioning
//! - scroll: Scroll region and scrolling operations
//! - editing: Erase and delete operations
//! - style: SGR (Select Graphic Rendition) handling
//! - modes: DEC private modes (cursor visibility, autowrap, alternate screen)

pub mod cursor;
pub mod editing;
pub mod modes;
pub mod scroll;
pub mod style;

use vte::Params;

/// Numeric CSI argument at `idx`, with `0`/missing mapped to `default`.
pub(crate) fn arg(params: &Params, idx: usize, default: usize) -> usize {
    params
        .iter()
        .nth(idx)
        .and_then(|p| p.first().copied())
        .filter(|&v| v != 0)
        .map(usize::from)
        .unwrap_or(default)
}

/// Raw numeric CSI argument at `idx` (missing maps to `0`).
pub(crate) fn raw_arg(params: &Params, idx: usize) -> usize {
    params
        .iter()
        .nth(idx)
        .and_then(|p| p.first().copied())
        .map(usize::from)
        .unwrap_or(0)
}
