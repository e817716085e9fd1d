// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # Cookie
//!
//! A small terminal text editor.
//!
//! Cookie edits one file at a time with:
//! - Syntax highlighting driven by user-editable filetype definitions
//! - Incremental search with wrap-around and match highlighting
//! - Tab expansion and wide-character aware cursor placement
//! - Live reload of the configuration directory
//!
//! ## Architecture
//!
//! Cookie uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text rows, cursor and editing operations
//! - [`highlight`]: Filetype definitions and the highlighter
//! - [`search`]: Incremental search
//! - [`ui`]: Terminal UI components
//! - [`config`]: Configuration files
//! - [`watcher`]: Configuration directory watching

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod search;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, update};
    pub use crate::editor::EditorBuffer;
    pub use crate::ui::viewport::Viewport;
}
