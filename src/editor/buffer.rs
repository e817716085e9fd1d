use std::sync::Arc;

use crate::highlight::Syntax;

use super::cursor::{Cursor, Direction};
use super::row::Row;

/// The row store: every line of the open file with its render cache,
/// the cursor, and a modification counter.
///
/// All mutations re-render the affected row and re-highlight it, carrying
/// the block-comment state forward until a row's carried state stops
/// changing.
pub struct EditorBuffer {
    rows: Vec<Row>,
    cursor: Cursor,
    dirty: usize,
    tab_stop: usize,
    syntax: Option<Arc<Syntax>>,
}

impl EditorBuffer {
    /// Create an empty buffer with zero rows.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            cursor: Cursor::default(),
            dirty: 0,
            tab_stop: tab_stop.max(1),
            syntax: None,
        }
    }

    /// Create a buffer holding `text`, one row per `\n`-separated line.
    ///
    /// A trailing `\r` on each line is dropped. Empty text yields zero rows.
    pub fn from_text(text: &str, tab_stop: usize, syntax: Option<Arc<Syntax>>) -> Self {
        let mut buf = Self::new(tab_stop);
        buf.syntax = syntax;
        if !text.is_empty() {
            buf.rows = text
                .split('\n')
                .enumerate()
                .map(|(idx, line)| Row::new(idx, line.strip_suffix('\r').unwrap_or(line)))
                .collect();
        }
        buf.rerender_all();
        buf
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor to `cursor`, clamped into the buffer.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor.row = cursor.row.min(self.rows.len());
        self.cursor.col = cursor.col;
        self.clamp_col();
    }

    /// Number of content-mutating operations since load or last save.
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// Total number of rows in the buffer.
    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    /// Row access for render-cache overlays; content stays immutable.
    pub(crate) fn row_mut(&mut self, idx: usize) -> Option<&mut Row> {
        self.rows.get_mut(idx)
    }

    /// Length in characters of `idx`, or 0 past the end.
    pub fn row_len(&self, idx: usize) -> usize {
        self.rows.get(idx).map_or(0, Row::len)
    }

    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Change the tab stop and rebuild every render cache.
    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        if tab_stop != self.tab_stop {
            self.tab_stop = tab_stop;
            self.rerender_all();
        }
    }

    pub fn syntax(&self) -> Option<&Syntax> {
        self.syntax.as_deref()
    }

    /// Switch the active syntax and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<Arc<Syntax>>) {
        self.syntax = syntax;
        self.rehighlight_all();
    }

    /// Rows joined with `\n`.
    pub fn text(&self) -> String {
        self.rows.iter().map(Row::text).collect::<Vec<_>>().join("\n")
    }

    // --- Row-level operations ---

    /// Insert a row holding `text` at `at`. Returns `false` if `at` is out of range.
    pub fn insert_row(&mut self, at: usize, text: &str) -> bool {
        if at > self.rows.len() {
            return false;
        }
        self.insert_row_chars(at, text.chars().collect());
        self.dirty += 1;
        true
    }

    /// Remove the row at `at`, returning it.
    pub fn delete_row(&mut self, at: usize) -> Option<Row> {
        if at >= self.rows.len() {
            return None;
        }
        let removed = self.remove_row(at);
        self.dirty += 1;
        Some(removed)
    }

    /// Split row `at` at character `offset`; the tail becomes a new row after it.
    pub fn split_row(&mut self, at: usize, offset: usize) -> bool {
        let Some(row) = self.rows.get_mut(at) else {
            return false;
        };
        let tail = row.split_off(offset);
        self.refresh_row(at);
        self.insert_row_chars(at + 1, tail);
        self.dirty += 1;
        true
    }

    /// Append row `at` to its predecessor and remove it.
    ///
    /// Returns the predecessor's length before the join, which is where the
    /// joined text starts.
    pub fn join_with_previous(&mut self, at: usize) -> Option<usize> {
        if at == 0 || at >= self.rows.len() {
            return None;
        }
        let prev_len = self.rows[at - 1].len();
        let removed = self.rows.remove(at);
        self.renumber_from(at);
        self.rows[at - 1].append_chars(removed.chars());
        self.refresh_row(at - 1);
        // The next row was highlighted against the removed row's carried state.
        if at < self.rows.len()
            && self.rows[at - 1].has_open_comment() != removed.has_open_comment()
        {
            self.rehighlight_from(at);
        }
        self.dirty += 1;
        Some(prev_len)
    }

    /// Insert `c` into row `row` at `at` (clamped to the row length).
    pub fn insert_char_at(&mut self, row: usize, at: usize, c: char) -> bool {
        let Some(target) = self.rows.get_mut(row) else {
            return false;
        };
        target.insert_char(at, c);
        self.refresh_row(row);
        self.dirty += 1;
        true
    }

    /// Delete the character at `at` in row `row`; out-of-range offsets are ignored.
    pub fn delete_char_at(&mut self, row: usize, at: usize) -> bool {
        let deleted = self
            .rows
            .get_mut(row)
            .is_some_and(|target| target.delete_char(at));
        if deleted {
            self.refresh_row(row);
            self.dirty += 1;
        }
        deleted
    }

    // --- Cursor-level editing ---

    /// Insert a character at the cursor, creating a row at the append position.
    pub fn insert_char(&mut self, c: char) {
        if self.cursor.row == self.rows.len() {
            self.insert_row_chars(self.rows.len(), Vec::new());
        }
        let Cursor { row, col } = self.cursor;
        self.rows[row].insert_char(col, c);
        self.refresh_row(row);
        self.cursor.col += 1;
        self.dirty += 1;
    }

    /// Break the line at the cursor (Enter).
    pub fn insert_newline(&mut self) {
        let Cursor { row, col } = self.cursor;
        if col == 0 || row >= self.rows.len() {
            self.insert_row_chars(row.min(self.rows.len()), Vec::new());
        } else {
            let tail = self.rows[row].split_off(col);
            self.refresh_row(row);
            self.insert_row_chars(row + 1, tail);
        }
        self.cursor.row = row + 1;
        self.cursor.col = 0;
        self.dirty += 1;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// At column zero the row is joined onto its predecessor.
    /// Returns `true` if anything changed.
    pub fn delete_back(&mut self) -> bool {
        let Cursor { row, col } = self.cursor;
        if row >= self.rows.len() || (row == 0 && col == 0) {
            return false;
        }
        if col > 0 {
            self.rows[row].delete_char(col - 1);
            self.refresh_row(row);
            self.cursor.col -= 1;
            self.dirty += 1;
        } else if let Some(prev_len) = self.join_with_previous(row) {
            self.cursor.row = row - 1;
            self.cursor.col = prev_len;
        }
        true
    }

    /// Delete the character under the cursor (Delete).
    ///
    /// Returns `true` if anything changed.
    pub fn delete_forward(&mut self) -> bool {
        let Cursor { row, col } = self.cursor;
        if row >= self.rows.len() || (row + 1 == self.rows.len() && col == self.row_len(row)) {
            return false;
        }
        self.move_cursor(Direction::Right);
        self.delete_back()
    }

    /// Remove the cursor row and park the cursor at the end of the previous row.
    pub fn delete_line(&mut self) {
        let row = self.cursor.row;
        if row < self.rows.len() {
            self.remove_row(row);
            self.dirty += 1;
        }
        self.cursor.col = 0;
        if row > 0 {
            self.cursor.row = row - 1;
            self.cursor.col = self.row_len(row - 1);
        }
    }

    // --- Cursor movement ---

    /// Move the cursor in the given direction.
    ///
    /// Left at column zero wraps to the end of the previous row; right at the
    /// end of a row wraps to the start of the next. Vertical motion stops at
    /// row zero and at the append position.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => {
                self.cursor.row = self.cursor.row.saturating_sub(1);
            }
            Direction::Down => {
                if self.cursor.row < self.rows.len() {
                    self.cursor.row += 1;
                }
            }
            Direction::Left => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                } else if self.cursor.row > 0 {
                    self.cursor.row -= 1;
                    self.cursor.col = self.row_len(self.cursor.row);
                }
            }
            Direction::Right => {
                if let Some(row) = self.rows.get(self.cursor.row) {
                    if self.cursor.col < row.len() {
                        self.cursor.col += 1;
                    } else {
                        self.cursor.row += 1;
                        self.cursor.col = 0;
                    }
                }
            }
        }
        self.clamp_col();
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.col = 0;
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        self.cursor.col = self.row_len(self.cursor.row);
    }

    // --- Private helpers ---

    fn clamp_col(&mut self) {
        self.cursor.col = self.cursor.col.min(self.row_len(self.cursor.row));
    }

    fn insert_row_chars(&mut self, at: usize, chars: Vec<char>) {
        let mut row = Row::new(at, "");
        row.append_chars(&chars);
        if at > 0 {
            row.seed_open_comment(self.rows[at - 1].has_open_comment());
        }
        row.rebuild_render(self.tab_stop);
        self.rows.insert(at, row);
        self.renumber_from(at + 1);
        self.rehighlight_from(at);
    }

    fn remove_row(&mut self, at: usize) -> Row {
        let removed = self.rows.remove(at);
        self.renumber_from(at);
        if at < self.rows.len() {
            self.rehighlight_from(at);
        }
        removed
    }

    fn renumber_from(&mut self, start: usize) {
        for (idx, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.set_index(idx);
        }
    }

    fn refresh_row(&mut self, idx: usize) {
        self.rows[idx].rebuild_render(self.tab_stop);
        self.rehighlight_from(idx);
    }

    /// Re-highlight `start`, then each following row while the carried
    /// comment state keeps changing.
    fn rehighlight_from(&mut self, start: usize) {
        let syntax = self.syntax.clone();
        let mut idx = start;
        while idx < self.rows.len() {
            let starts_in_comment = idx > 0 && self.rows[idx - 1].has_open_comment();
            if !self.rows[idx].rehighlight(syntax.as_deref(), starts_in_comment) {
                break;
            }
            idx += 1;
        }
    }

    fn rehighlight_all(&mut self) {
        let syntax = self.syntax.clone();
        let mut open = false;
        for row in &mut self.rows {
            row.rehighlight(syntax.as_deref(), open);
            open = row.has_open_comment();
        }
    }

    fn rerender_all(&mut self) {
        for row in &mut self.rows {
            row.rebuild_render(self.tab_stop);
        }
        self.rehighlight_all();
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rows", &format_args!("Rows({})", self.rows.len()))
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .field("tab_stop", &self.tab_stop)
            .field(
                "syntax",
                &self.syntax.as_ref().map(|syntax| syntax.filetype.as_str()),
            )
            .finish()
    }
}
