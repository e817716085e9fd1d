use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{App, HELP_MESSAGE, Message, Model, update};
use crate::watcher::ConfigWatcher;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, reading the initial
    /// file, or the event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - cookie requires an interactive terminal")?;
        let size = terminal.size()?;

        let result = self
            .initial_model((size.width, size.height))
            .and_then(|mut model| self.event_loop(&mut terminal, &mut model));

        ratatui::restore();
        result
    }

    fn initial_model(&self, terminal_size: (u16, u16)) -> Result<Model> {
        let mut model = Model::new(terminal_size, self.settings.clone());
        if let Some(path) = &self.file_path {
            model.open_file(path)?;
        }
        model.set_status(HELP_MESSAGE);
        Ok(model)
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut config_watcher = match self.make_config_watcher() {
            Ok(watcher) => {
                tracing::debug!(dir = %watcher.dir().display(), "watching config");
                Some(watcher)
            }
            Err(err) => {
                tracing::warn!(
                    dir = %self.config_dir.display(),
                    "config watch unavailable: {err}"
                );
                None
            }
        };
        let mut needs_render = true;
        let mut status_shown = false;

        loop {
            // The message bar hides itself once the status message ages out.
            let status_visible = model.status_message_at(Instant::now()).is_some();
            if status_visible != status_shown {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if config_watcher
                .as_mut()
                .is_some_and(ConfigWatcher::take_change_ready)
            {
                self.dispatch(model, Message::ConfigChanged);
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    self.dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                status_shown = model.status_message_at(Instant::now()).is_some();
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }

    fn dispatch(&self, model: &mut Model, msg: Message) {
        tracing::trace!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }
}
