//! Cursor position and logical/rendered column mapping.
//!
//! A row's logical offsets count characters; its rendered columns count
//! terminal cells after tab expansion and wide-glyph widths. Every mapping
//! here walks the same [`char_width`] accounting so conversions never drift.

use unicode_width::UnicodeWidthChar;

/// Cursor position in the editor buffer.
///
/// `row == line_count` is the append position one past the last row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based character offset within the row.
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at a specific position.
    pub const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Display width of a non-tab character.
///
/// Control characters have no width of their own but are drawn as a single
/// substitute glyph, so they count as one cell.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/// Rendered column reached after `c` when it starts at `col`.
pub const fn advance(col: usize, c: char, width: usize, tab_stop: usize) -> usize {
    if c == '\t' {
        col + tab_stop - (col % tab_stop)
    } else {
        col + width
    }
}

fn advance_char(col: usize, c: char, tab_stop: usize) -> usize {
    advance(col, c, char_width(c), tab_stop)
}

/// Rendered column of logical offset `cx` (clamped to the row length).
pub fn cx_to_rx(chars: &[char], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    chars
        .iter()
        .take(cx)
        .fold(0, |rx, &c| advance_char(rx, c, tab_stop))
}

/// Logical offset of the character covering rendered column `rx`.
///
/// Columns past the end of the row map to the row length.
pub fn rx_to_cx(chars: &[char], rx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let mut cur = 0;
    for (cx, &c) in chars.iter().enumerate() {
        cur = advance_char(cur, c, tab_stop);
        if cur > rx {
            return cx;
        }
    }
    chars.len()
}

/// Render `chars` for display: tabs become spaces up to the next tab stop.
pub fn expand_tabs(chars: &[char], tab_stop: usize) -> String {
    let tab_stop = tab_stop.max(1);
    let mut out = String::with_capacity(chars.len());
    let mut col = 0;
    for &c in chars {
        let next = advance_char(col, c, tab_stop);
        if c == '\t' {
            out.extend(std::iter::repeat_n(' ', next - col));
        } else {
            out.push(c);
        }
        col = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_plain_ascii_maps_one_to_one() {
        let row = chars("hello");
        for cx in 0..=5 {
            assert_eq!(cx_to_rx(&row, cx, 4), cx);
            assert_eq!(rx_to_cx(&row, cx, 4), cx);
        }
    }

    #[test]
    fn test_tab_advances_to_next_stop() {
        let row = chars("a\tb");
        assert_eq!(cx_to_rx(&row, 1, 4), 1);
        assert_eq!(cx_to_rx(&row, 2, 4), 4);
        assert_eq!(cx_to_rx(&row, 3, 4), 5);
    }

    #[test]
    fn test_leading_tab_is_full_stop() {
        let row = chars("\tb");
        assert_eq!(cx_to_rx(&row, 1, 8), 8);
    }

    #[test]
    fn test_rx_inside_tab_maps_to_tab() {
        let row = chars("\tb");
        assert_eq!(rx_to_cx(&row, 0, 4), 0);
        assert_eq!(rx_to_cx(&row, 3, 4), 0);
        assert_eq!(rx_to_cx(&row, 4, 4), 1);
    }

    #[test]
    fn test_wide_glyph_counts_two_columns() {
        let row = chars("日x");
        assert_eq!(cx_to_rx(&row, 1, 4), 2);
        assert_eq!(rx_to_cx(&row, 1, 4), 0);
        assert_eq!(rx_to_cx(&row, 2, 4), 1);
    }

    #[test]
    fn test_cx_past_end_is_clamped() {
        let row = chars("ab");
        assert_eq!(cx_to_rx(&row, 10, 4), 2);
        assert_eq!(rx_to_cx(&row, 10, 4), 2);
    }

    #[test]
    fn test_zero_tab_stop_behaves_like_one() {
        let row = chars("\t\t");
        assert_eq!(cx_to_rx(&row, 2, 0), 2);
        assert_eq!(expand_tabs(&row, 0), "  ");
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs(&chars("\tb"), 4), "    b");
        assert_eq!(expand_tabs(&chars("ab\tc"), 4), "ab  c");
        assert_eq!(expand_tabs(&chars("abcd\te"), 4), "abcd    e");
        assert_eq!(expand_tabs(&chars("日\tx"), 4), "日  x");
    }

    #[test]
    fn test_control_char_is_one_cell() {
        assert_eq!(char_width('\u{1}'), 1);
    }

    proptest! {
        #[test]
        fn prop_rx_cx_round_trip(text in "[a-z\\t日é ]{0,24}", tab_stop in 1usize..9) {
            let row: Vec<char> = text.chars().collect();
            for cx in 0..=row.len() {
                let rx = cx_to_rx(&row, cx, tab_stop);
                let back = rx_to_cx(&row, rx, tab_stop);
                prop_assert_eq!(back, cx);
                prop_assert_eq!(cx_to_rx(&row, back, tab_stop), rx);
            }
        }

        #[test]
        fn prop_render_width_matches_mapping(text in "[a-z\\t日 ]{0,24}", tab_stop in 1usize..9) {
            let row: Vec<char> = text.chars().collect();
            let render = expand_tabs(&row, tab_stop);
            let width: usize = render.chars().map(char_width).sum();
            prop_assert_eq!(width, cx_to_rx(&row, row.len(), tab_stop));
        }
    }
}
