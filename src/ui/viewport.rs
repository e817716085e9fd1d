//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the text area of the terminal and the
//! scroll offsets that keep the cursor visible.

use std::ops::Range;

/// The visible window onto the buffer.
///
/// `row_offset` counts rows, `col_offset` counts rendered columns.
///
/// # Example
///
/// ```
/// use cookie::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24);
/// vp.follow(30, 0);
/// assert_eq!(vp.visible_rows(), 7..31);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    row_offset: usize,
    col_offset: usize,
}

impl Viewport {
    /// Create a viewport for a text area of `width` x `height` cells.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            row_offset: 0,
            col_offset: 0,
        }
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Number of text rows on screen.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// First visible row.
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible rendered column.
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Range of buffer rows that fit on screen.
    pub const fn visible_rows(&self) -> Range<usize> {
        self.row_offset..self.row_offset + self.height as usize
    }

    /// Scroll just enough to keep (`row`, rendered column `rx`) on screen.
    pub fn follow(&mut self, row: usize, rx: usize) {
        let rows = usize::from(self.height.max(1));
        let cols = usize::from(self.width.max(1));
        if row < self.row_offset {
            self.row_offset = row;
        }
        if row >= self.row_offset + rows {
            self.row_offset = row + 1 - rows;
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + cols {
            self.col_offset = rx + 1 - cols;
        }
    }

    /// Put `row` at the top of the screen.
    pub const fn snap_to_row(&mut self, row: usize) {
        self.row_offset = row;
    }

    /// Restore previously saved offsets.
    pub const fn set_offsets(&mut self, row_offset: usize, col_offset: usize) {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
    }

    /// Resize the text area. Offsets are corrected on the next [`follow`](Self::follow).
    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24);
        assert_eq!(vp.row_offset(), 0);
        assert_eq!(vp.col_offset(), 0);
        assert_eq!(vp.visible_rows(), 0..24);
    }

    #[test]
    fn test_follow_cursor_below_makes_it_last_row() {
        let mut vp = Viewport::new(80, 10);
        vp.follow(15, 0);
        assert_eq!(vp.row_offset(), 6);
        assert_eq!(vp.visible_rows(), 6..16);
    }

    #[test]
    fn test_follow_cursor_above_makes_it_first_row() {
        let mut vp = Viewport::new(80, 10);
        vp.follow(50, 0);
        vp.follow(20, 0);
        assert_eq!(vp.row_offset(), 20);
    }

    #[test]
    fn test_follow_inside_window_does_not_scroll() {
        let mut vp = Viewport::new(80, 10);
        vp.follow(15, 0);
        vp.follow(10, 0);
        assert_eq!(vp.row_offset(), 6);
    }

    #[test]
    fn test_follow_horizontal() {
        let mut vp = Viewport::new(10, 5);
        vp.follow(0, 12);
        assert_eq!(vp.col_offset(), 3);
        vp.follow(0, 1);
        assert_eq!(vp.col_offset(), 1);
    }

    #[test]
    fn test_snap_to_row_puts_row_on_top() {
        let mut vp = Viewport::new(80, 10);
        vp.snap_to_row(42);
        vp.follow(42, 0);
        assert_eq!(vp.row_offset(), 42);
    }

    #[test]
    fn test_zero_height_does_not_underflow() {
        let mut vp = Viewport::new(0, 0);
        vp.follow(3, 3);
        assert_eq!(vp.row_offset(), 3);
        assert_eq!(vp.col_offset(), 3);
    }

    #[test]
    fn test_resize_keeps_offsets() {
        let mut vp = Viewport::new(80, 10);
        vp.set_offsets(5, 2);
        vp.resize(40, 20);
        assert_eq!(vp.width(), 40);
        assert_eq!(vp.height(), 20);
        assert_eq!(vp.row_offset(), 5);
        assert_eq!(vp.col_offset(), 2);
    }
}
