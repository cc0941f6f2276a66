//! ANSI escape code conversion utilities.
//!
//! Converts span styles back to SGR sequences for terminal output.

use crate::terminal::{Line, Span, SpanColor};

const RESET: &str = "\x1b[0m";

/// Append the SGR code for a span color.
///
/// Palette entries 0-15 use the classic 30-37/90-97 (40-47/100-107)
/// codes, the rest use the 256-color and truecolor forms.
///
/// # Returns
/// `true` if a code was appended, `false` for an unparsable color
pub fn color_to_ansi(color: &SpanColor, foreground: bool, buf: &mut String) -> bool {
    let base = if foreground { 30 } else { 40 };
    match color {
        SpanColor::Indexed(n @ 0..=7) => {
            buf.push_str(&format!("\x1b[{}m", base + *n as u16));
            true
        }
        SpanColor::Indexed(n @ 8..=15) => {
            buf.push_str(&format!("\x1b[{}m", base + 60 + (*n - 8) as u16));
            true
        }
        SpanColor::Indexed(n) => {
            buf.push_str(&format!("\x1b[{};5;{}m", base + 8, n));
            true
        }
        SpanColor::Rgb(hex) => match parse_hex(hex) {
            Some((r, g, b)) => {
                buf.push_str(&format!("\x1b[{};2;{};{};{}m", base + 8, r, g, b));
                true
            }
            None => false,
        },
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Append ANSI codes for text attributes.
pub fn attrs_to_ansi(span: &Span, buf: &mut String) {
    let attrs = [
        (span.bold, "\x1b[1m"),
        (span.faint, "\x1b[2m"),
        (span.italic, "\x1b[3m"),
        (span.underline, "\x1b[4m"),
        (span.blink, "\x1b[5m"),
        (span.inverse, "\x1b[7m"),
        (span.strikethrough, "\x1b[9m"),
    ];
    for (_, code) in attrs.iter().filter(|(on, _)| *on) {
        buf.push_str(code);
    }
}

/// Render a line with its styling. Styled spans are closed with a reset.
pub fn line_to_ansi(line: &Line) -> String {
    let mut buf = String::new();
    for span in &line.spans {
        if span.is_unstyled() {
            buf.push_str(&span.text);
            continue;
        }
        let mut styled = false;
        if let Some(fg) = &span.fg {
            styled |= color_to_ansi(fg, true, &mut buf);
        }
        if let Some(bg) = &span.bg {
            styled |= color_to_ansi(bg, false, &mut buf);
        }
        let before = buf.len();
        attrs_to_ansi(span, &mut buf);
        styled |= buf.len() > before;

        buf.push_str(&span.text);
        if styled {
            buf.push_str(RESET);
        }
    }
    buf
}
