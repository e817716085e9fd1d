//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Highlight colors

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{control_glyph, render, row_line};
pub use status::{status_bar_text, truncate_to_width};

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
