use std::time::Duration;

use crate::app::{App, Message, Model};
use crate::watcher::ConfigWatcher;

impl App {
    pub(super) fn make_config_watcher(&self) -> notify::Result<ConfigWatcher> {
        ConfigWatcher::new(&self.config_dir, Duration::from_millis(200))
    }

    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        if std::mem::take(&mut model.pending_save) {
            save_file(model);
        }
        if matches!(msg, Message::ConfigChanged) {
            self.reload_config(model);
        }
    }

    fn reload_config(&self, model: &mut Model) {
        match crate::config::load_settings(&self.config_dir, &self.overrides) {
            Ok(settings) => {
                tracing::info!(dir = %self.config_dir.display(), "configuration reloaded");
                model.apply_settings(settings);
            }
            Err(err) => {
                tracing::warn!(dir = %self.config_dir.display(), "config reload failed: {err:#}");
                model.set_status(format!("Config reload failed: {err:#}"));
            }
        }
    }
}

/// Write the buffer and report the outcome in the message bar.
pub(super) fn save_file(model: &mut Model) {
    match model.save() {
        Ok(bytes) => model.set_status(format!("{bytes} bytes written to disk")),
        Err(err) => {
            tracing::warn!(path = ?err.path(), "save failed: {err}");
            model.set_status(format!("Can't save! I/O error: {err}"));
        }
    }
}
