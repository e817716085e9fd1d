//! Incremental search.
//!
//! A [`SearchSession`] lives for the duration of one Find prompt. Each
//! keystroke calls [`SearchSession::step`], which first removes the match
//! overlay left by the previous step, then scans rows cyclically from the
//! last match in the current direction.

use crate::editor::{Cursor, EditorBuffer, char_width};
use crate::highlight::Highlight;

/// Scan direction through the rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// What the last prompt keystroke did to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// The query text changed; restart from the top.
    Edit,
    /// Jump to the next match.
    Next,
    /// Jump to the previous match.
    Previous,
}

/// Cursor and scroll position captured when the session started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedView {
    pub cursor: Cursor,
    pub row_offset: usize,
    pub col_offset: usize,
}

/// A located occurrence of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub row: usize,
    /// Logical offset of the first matched character.
    pub col: usize,
    /// Rendered column of the first matched character.
    pub rx: usize,
}

/// State of one incremental search.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    saved: SavedView,
    last_match: Option<usize>,
    direction: SearchDirection,
    overlay: Option<(usize, Vec<Highlight>)>,
}

impl SearchSession {
    pub fn new(saved: SavedView) -> Self {
        Self {
            saved,
            ..Self::default()
        }
    }

    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Advance the search for `query` after a prompt keystroke.
    ///
    /// On a match the buffer cursor moves to it and the matched range is
    /// tagged [`Highlight::Match`] until the next call. Returns `None` and
    /// leaves the cursor alone when nothing matches.
    pub fn step(
        &mut self,
        buffer: &mut EditorBuffer,
        query: &str,
        key: SearchKey,
    ) -> Option<SearchMatch> {
        self.restore_overlay(buffer);

        match key {
            SearchKey::Next => self.direction = SearchDirection::Forward,
            SearchKey::Previous => self.direction = SearchDirection::Backward,
            SearchKey::Edit => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        let count = buffer.line_count();
        if query.is_empty() || count == 0 {
            return None;
        }

        let mut current = self.last_match;
        for _ in 0..count {
            let idx = match (current, self.direction) {
                (None, _) => 0,
                (Some(i), SearchDirection::Forward) => (i.min(count - 1) + 1) % count,
                (Some(i), SearchDirection::Backward) => (i.min(count - 1) + count - 1) % count,
            };
            current = Some(idx);

            let Some(row) = buffer.row(idx) else {
                continue;
            };
            let Some(byte) = row.render().find(query) else {
                continue;
            };

            let before = &row.render()[..byte];
            let start = before.chars().count();
            let rx: usize = before.chars().map(char_width).sum();
            let col = row.rx_to_cx(rx, buffer.tab_stop());

            self.last_match = Some(idx);
            buffer.set_cursor(Cursor::at(idx, col));

            if let Some(row) = buffer.row_mut(idx) {
                self.overlay = Some((idx, row.highlights().to_vec()));
                row.overlay(start..start + query.chars().count(), Highlight::Match);
            }
            return Some(SearchMatch { row: idx, col, rx });
        }
        None
    }

    /// Put back the tags hidden by the current match overlay, if any.
    pub fn restore_overlay(&mut self, buffer: &mut EditorBuffer) {
        if let Some((idx, saved)) = self.overlay.take()
            && let Some(row) = buffer.row_mut(idx)
        {
            row.restore_highlights(saved);
        }
    }

    /// Accept the search: the cursor stays on the last match.
    pub fn confirm(mut self, buffer: &mut EditorBuffer) {
        self.restore_overlay(buffer);
    }

    /// Abort the search, returning the view to restore.
    pub fn cancel(mut self, buffer: &mut EditorBuffer) -> SavedView {
        self.restore_overlay(buffer);
        buffer.set_cursor(self.saved.cursor);
        self.saved
    }
}
