//! Terminal data types.
//!
//! Contains the core data structures for representing terminal state:
//! - Color: ANSI color codes (16 colors, 256-color palette, RGB)
//! - CellStyle: Text attributes (bold, italic, underline, etc.)
//! - Cell: A single character with its style
//! - Span / Line: the serializable, style-run form of a rendered row
//! - ViewportSnapshot: the visible screen at one point in time

use serde::{Deserialize, Serialize};

/// Terminal color as set by SGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// 256-color palette entry (`38;5;n`)
    Indexed(u8),
    /// Truecolor (`38;2;r;g;b`)
    Rgb(u8, u8, u8),
}

impl Color {
    /// Map a 4-bit color index (0-15) to its named variant.
    pub fn from_index(n: u8) -> Self {
        match n {
            0 => Color::Black,
            1 => Color::Red,
            2 => Color::Green,
            3 => Color::Yellow,
            4 => Color::Blue,
            5 => Color::Magenta,
            6 => Color::Cyan,
            7 => Color::White,
            8 => Color::BrightBlack,
            9 => Color::BrightRed,
            10 => Color::BrightGreen,
            11 => Color::BrightYellow,
            12 => Color::BrightBlue,
            13 => Color::BrightMagenta,
            14 => Color::BrightCyan,
            15 => Color::BrightWhite,
            n => Color::Indexed(n),
        }
    }

    /// Palette index for the named and indexed variants.
    fn index(&self) -> Option<u8> {
        let idx = match self {
            Color::Default | Color::Rgb(..) => return None,
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::BrightBlack => 8,
            Color::BrightRed => 9,
            Color::BrightGreen => 10,
            Color::BrightYellow => 11,
            Color::BrightBlue => 12,
            Color::BrightMagenta => 13,
            Color::BrightCyan => 14,
            Color::BrightWhite => 15,
            Color::Indexed(n) => *n,
        };
        Some(idx)
    }

    /// Convert to the serialized span color, `None` for the default color.
    pub fn to_span_color(&self) -> Option<SpanColor> {
        match self {
            Color::Default => None,
            Color::Rgb(r, g, b) => Some(SpanColor::Rgb(format!("#{:02X}{:02X}{:02X}", r, g, b))),
            other => other.index().map(SpanColor::Indexed),
        }
    }
}

/// Text attributes of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub blink: bool,
    pub reverse: bool,
}

/// A single character cell.
///
/// Wide characters occupy two cells: the first has `width == 2`, the
/// second is a continuation cell with `width == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub style: CellStyle,
    pub width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            style: CellStyle::default(),
            width: 1,
        }
    }
}

impl Cell {
    pub fn new(char: char, style: CellStyle, width: u8) -> Self {
        Self { char, style, width }
    }

    pub fn is_blank(&self) -> bool {
        (self.char == ' ' || self.width == 0) && self.style == CellStyle::default()
    }
}

/// Serialized color: a palette index (number) or `#RRGGBB` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpanColor {
    Indexed(u8),
    Rgb(String),
}

fn is_false(b: &bool) -> bool {
    !b
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<SpanColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<SpanColor>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub faint: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
}

impl Span {
    /// Unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn from_style(style: &CellStyle) -> Self {
        Self {
            text: String::new(),
            fg: style.fg.to_span_color(),
            bg: style.bg.to_span_color(),
            bold: style.bold,
            faint: style.dim,
            italic: style.italic,
            underline: style.underline,
            strikethrough: style.strikethrough,
            blink: style.blink,
            inverse: style.reverse,
        }
    }

    /// True when the span carries no color and no attribute.
    pub fn is_unstyled(&self) -> bool {
        self.fg.is_none()
            && self.bg.is_none()
            && !(self.bold
                || self.faint
                || self.italic
                || self.underline
                || self.strikethrough
                || self.blink
                || self.inverse)
    }
}

/// One rendered terminal row as a sequence of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    /// Unstyled line with the given text (empty text gives an empty line).
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// True if the line has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }

    /// Build a line from a row of cells.
    ///
    /// Consecutive cells with identical styles merge into one span,
    /// continuation cells of wide characters are skipped and trailing
    /// unstyled blanks are dropped.
    pub fn from_cells(cells: &[Cell]) -> Self {
        let end = cells
            .iter()
            .rposition(|c| !c.is_blank())
            .map(|i| i + 1)
            .unwrap_or(0);

        let mut spans: Vec<Span> = Vec::new();
        let mut current_style: Option<CellStyle> = None;

        for cell in &cells[..end] {
            if cell.width == 0 {
                continue;
            }
            match spans.last_mut() {
                Some(span) if current_style == Some(cell.style) => span.text.push(cell.char),
                _ => {
                    let mut span = Span::from_style(&cell.style);
                    span.text.push(cell.char);
                    spans.push(span);
                    current_style = Some(cell.style);
                }
            }
        }

        Self { spans }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::plain(text)
    }
}

/// The visible screen at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub cols: usize,
    pub rows: usize,
    pub lines: Vec<Line>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(c: char) -> Cell {
        Cell::new(c, CellStyle::default(), 1)
    }

    #[test]
    fn from_cells_merges_equal_styles() {
        let bold = CellStyle {
            bold: true,
            ..Default::default()
        };
        let cells = vec![cell('a'), cell('b'), Cell::new('c', bold, 1), cell('d')];
        let line = Line::from_cells(&cells);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].text, "ab");
        assert!(line.spans[1].bold);
        assert_eq!(line.text(), "abcd");
    }

    #[test]
    fn from_cells_trims_trailing_blanks() {
        let cells = vec![cell('x'), cell(' '), cell(' ')];
        assert_eq!(Line::from_cells(&cells).text(), "x");
        assert!(Line::from_cells(&[cell(' ')]).spans.is_empty());
    }

    #[test]
    fn from_cells_skips_wide_continuation() {
        let cells = vec![
            Cell::new('漢', CellStyle::default(), 2),
            Cell::new(' ', CellStyle::default(), 0),
            cell('x'),
        ];
        assert_eq!(Line::from_cells(&cells).text(), "漢x");
    }

    #[test]
    fn span_colors_serialize_as_index_or_hex() {
        assert_eq!(Color::Red.to_span_color(), Some(SpanColor::Indexed(1)));
        assert_eq!(Color::Indexed(200).to_span_color(), Some(SpanColor::Indexed(200)));
        assert_eq!(
            Color::Rgb(255, 0, 16).to_span_color(),
            Some(SpanColor::Rgb("#FF0010".to_string()))
        );
        assert_eq!(Color::Default.to_span_color(), None);

        let span = Span {
            text: "hi".into(),
            fg: Some(SpanColor::Indexed(9)),
            bold: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"text":"hi","fg":9,"bold":true}"#);
    }

    #[test]
    fn blank_detection() {
        assert!(Line::plain("   ").is_blank());
        assert!(Line::default().is_blank());
        assert!(!Line::plain(" x ").is_blank());
    }
}
