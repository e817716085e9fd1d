//! Text storage for the editor.
//!
//! Rows of characters with a cached tab-expanded rendering and highlight
//! tags, the cursor, and the mapping between logical and rendered columns.

mod buffer;
mod cursor;
mod row;

pub use buffer::EditorBuffer;
pub use cursor::{Cursor, Direction, char_width, cx_to_rx, expand_tabs, rx_to_cx};
pub use row::Row;
