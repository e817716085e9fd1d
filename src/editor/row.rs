use crate::highlight::{Highlight, Syntax, highlight_line};

use super::cursor::{cx_to_rx, expand_tabs, rx_to_cx};

/// One line of the edited file plus its render cache.
///
/// `render` and `hl` are derived from `chars` and are rebuilt by every
/// mutation that goes through [`EditorBuffer`](super::EditorBuffer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    idx: usize,
    chars: Vec<char>,
    render: String,
    hl: Vec<Highlight>,
    open_comment: bool,
}

impl Row {
    pub(super) fn new(idx: usize, text: &str) -> Self {
        Self {
            idx,
            chars: text.chars().collect(),
            ..Self::default()
        }
    }

    /// Position of this row in the buffer.
    pub const fn index(&self) -> usize {
        self.idx
    }

    /// Raw characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters (logical length).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Raw content as a string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Tab-expanded display text.
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Highlight tags, one per character of [`render`](Self::render).
    pub fn highlights(&self) -> &[Highlight] {
        &self.hl
    }

    /// Whether the row ends inside an unterminated block comment.
    pub const fn has_open_comment(&self) -> bool {
        self.open_comment
    }

    /// Rendered column of logical offset `cx`.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        cx_to_rx(&self.chars, cx, tab_stop)
    }

    /// Logical offset covering rendered column `rx`.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        rx_to_cx(&self.chars, rx, tab_stop)
    }

    pub(super) const fn set_index(&mut self, idx: usize) {
        self.idx = idx;
    }

    pub(super) const fn seed_open_comment(&mut self, open: bool) {
        self.open_comment = open;
    }

    pub(super) fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
    }

    /// Remove the character at `at`; out-of-range offsets are ignored.
    pub(super) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        true
    }

    pub(super) fn append_chars(&mut self, chars: &[char]) {
        self.chars.extend_from_slice(chars);
    }

    /// Cut the row at `at`, returning the tail.
    pub(super) fn split_off(&mut self, at: usize) -> Vec<char> {
        let at = at.min(self.chars.len());
        self.chars.split_off(at)
    }

    pub(super) fn rebuild_render(&mut self, tab_stop: usize) {
        self.render = expand_tabs(&self.chars, tab_stop);
    }

    /// Recompute tags; returns whether the carried comment state changed.
    pub(super) fn rehighlight(&mut self, syntax: Option<&Syntax>, starts_in_comment: bool) -> bool {
        let line = highlight_line(&self.render, syntax, starts_in_comment);
        let changed = line.open_comment != self.open_comment;
        self.hl = line.tags;
        self.open_comment = line.open_comment;
        changed
    }

    /// Overwrite tags in `range` (render character indices) for a search match.
    pub(crate) fn overlay(&mut self, range: std::ops::Range<usize>, tag: Highlight) {
        let end = range.end.min(self.hl.len());
        let start = range.start.min(end);
        self.hl[start..end].fill(tag);
    }

    /// Put back a tag snapshot taken before an overlay.
    pub(crate) fn restore_highlights(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.hl.len() {
            self.hl = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_char_clamps_offset() {
        let mut row = Row::new(0, "ab");
        row.insert_char(99, 'c');
        assert_eq!(row.text(), "abc");
        row.insert_char(0, 'x');
        assert_eq!(row.text(), "xabc");
    }

    #[test]
    fn test_delete_char_out_of_range_is_noop() {
        let mut row = Row::new(0, "ab");
        assert!(!row.delete_char(2));
        assert!(row.delete_char(0));
        assert_eq!(row.text(), "b");
    }

    #[test]
    fn test_split_off_keeps_head() {
        let mut row = Row::new(0, "hello world");
        let tail = row.split_off(5);
        assert_eq!(row.text(), "hello");
        assert_eq!(tail.iter().collect::<String>(), " world");
    }

    #[test]
    fn test_overlay_and_restore() {
        let mut row = Row::new(0, "abcd");
        row.rebuild_render(4);
        row.rehighlight(None, false);
        let saved = row.highlights().to_vec();
        row.overlay(1..3, Highlight::Match);
        assert_eq!(row.highlights()[1], Highlight::Match);
        assert_eq!(row.highlights()[3], Highlight::Normal);
        row.restore_highlights(saved);
        assert!(row.highlights().iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_restore_with_stale_snapshot_is_ignored() {
        let mut row = Row::new(0, "abcd");
        row.rebuild_render(4);
        row.rehighlight(None, false);
        row.restore_highlights(vec![Highlight::Match; 2]);
        assert_eq!(row.highlights().len(), 4);
        assert_eq!(row.highlights()[0], Highlight::Normal);
    }
}
