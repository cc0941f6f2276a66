use super::{row_text, term};
use crate::terminal::Emulator;

#[test]
fn erase_to_end_of_line() {
    let mut t = term(80, 24);
    t.process("hello\x1b[3G\x1b[K");
    assert_eq!(row_text(&t, 0), "he");
}

#[test]
fn erase_display_clears_without_scrollback() {
    let mut t = term(80, 24);
    t.process("a\r\nb\x1b[2J");
    assert_eq!(t.scrollback_len(), 0);
    assert!(t.all_lines().is_empty());
    assert_eq!(t.captured_line_count(), 0);
}

#[test]
fn erase_scrollback_keeps_history() {
    let mut t = term(10, 2);
    t.process("1\r\n2\r\n3");
    assert_eq!(t.scrollback_len(), 1);
    assert!(t.process("\x1b[3J").is_some());
    assert_eq!(t.scrollback_len(), 1);
    assert_eq!(t.committed_line_count(), 1);
    assert_eq!(row_text(&t, 1), "3");
}

#[test]
fn delete_chars_shifts_left() {
    let mut t = term(80, 24);
    t.process("abcdef\x1b[1G\x1b[2P");
    assert_eq!(row_text(&t, 0), "cdef");
}

#[test]
fn insert_chars_shifts_right() {
    let mut t = term(80, 24);
    t.process("abc\x1b[1G\x1b[2@");
    assert_eq!(row_text(&t, 0), "  abc");
}

#[test]
fn delete_lines_pull_up() {
    let mut t = term(10, 4);
    t.process("a\r\nb\r\nc\x1b[1;1H\x1b[M");
    assert_eq!(row_text(&t, 0), "b");
    assert_eq!(row_text(&t, 1), "c");
    assert_eq!(t.scrollback_len(), 0);
}
