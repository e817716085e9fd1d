//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    FOOTER_ROWS, HELP_MESSAGE, Model, Prompt, PromptKind, STATUS_MESSAGE_TTL,
};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::{ConfigOverrides, Settings};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    config_dir: PathBuf,
    overrides: ConfigOverrides,
    settings: Settings,
}

impl App {
    /// Create a new application with already-loaded settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            file_path: None,
            config_dir: crate::config::config_dir(),
            overrides: ConfigOverrides::default(),
            settings,
        }
    }

    /// Open `path` on startup.
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Directory watched for configuration changes.
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = dir;
        self
    }

    /// Command-line values re-applied whenever the configuration reloads.
    pub const fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}
