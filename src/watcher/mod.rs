//! Configuration watching for live reload.
//!
//! Uses notify crate for cross-platform file system events. Events arrive on
//! notify's thread and are handed to the event loop over a channel, so the
//! editor state is only ever touched by the loop itself.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::{CONFIG_FILE, SYNTAX_FILE};

/// Watches the config directory and emits debounced change notifications
/// for `config.json` and `syntax.json`.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    dir: PathBuf,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl ConfigWatcher {
    /// Create a watcher for the config directory `dir`.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory cannot be watched.
    pub fn new(dir: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Canonicalize so event paths from the OS (which are always absolute
        // and canonical) match our stored paths.
        let dir = dir
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| dir.as_ref().to_path_buf());

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            dir,
            debounce,
            pending_since: None,
        })
    }

    /// The canonical path of the watched directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true once a debounced config change is ready.
    pub fn take_change_ready(&mut self) -> bool {
        let mut saw_relevant_event = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if is_relevant(&ev) => {
                    saw_relevant_event = true;
                }
                Ok(ev) => {
                    tracing::trace!(kind = ?ev.kind, paths = ?ev.paths, "ignored watcher event");
                }
                Err(err) => {
                    tracing::warn!("config watcher error: {err}");
                }
            }
        }

        if saw_relevant_event {
            self.pending_since = Some(Instant::now());
        }

        let Some(pending_since) = self.pending_since else {
            return false;
        };
        if pending_since.elapsed() >= self.debounce {
            self.pending_since = None;
            return true;
        }
        false
    }
}

fn is_relevant(event: &Event) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .is_some_and(|name| name == OsStr::new(CONFIG_FILE) || name == OsStr::new(SYNTAX_FILE))
    })
}
