use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, Settings};
use crate::editor::{Cursor, EditorBuffer};
use crate::error::FileError;
use crate::highlight::{Syntax, select_syntax};
use crate::search::{SavedView, SearchKey, SearchMatch, SearchSession};
use crate::ui::viewport::Viewport;

/// How long a status message stays on screen.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Rows reserved below the text area for the status and message bars.
pub const FOOTER_ROWS: u16 = 2;

pub const HELP_MESSAGE: &str =
    "Help: Ctrl-S = Save | Ctrl-Q = Quit | Ctrl-F = Find | Ctrl-D = Delete Line";

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// Which command owns the prompt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveAs,
    Find,
}

/// A single-line prompt in the message bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    /// The message bar text for the current input.
    pub fn status_line(&self) -> String {
        match self.kind {
            PromptKind::SaveAs => format!("Save as: {} (ESC to cancel)", self.input),
            PromptKind::Find => format!(
                "Search: {} (ESC = Cancel | Enter = Confirm | Arrows = Prev/Next)",
                self.input
            ),
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Rows of the open file
    pub buffer: EditorBuffer,
    /// Text area size and scroll offsets
    pub viewport: Viewport,
    /// Rendered column of the cursor, refreshed by [`Model::scroll`]
    pub rx: usize,
    /// File being edited; `None` until the first Save-As
    pub filename: Option<PathBuf>,
    pub config: Config,
    /// Filetype definitions, in match priority order
    pub syntaxes: Vec<Arc<Syntax>>,
    status: Option<StatusMessage>,
    /// Consecutive quit requests made while the buffer is dirty
    pub quit_counter: usize,
    /// Active prompt, if any
    pub prompt: Option<Prompt>,
    search: Option<SearchSession>,
    /// Set by update when the buffer should be written; consumed by effects
    pub(super) pending_save: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("filename", &self.filename)
            .field("prompt", &self.prompt)
            .field("quit_counter", &self.quit_counter)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24), Settings::default())
    }
}

impl Model {
    /// Create an empty editor for a terminal of `terminal_size` (width, height).
    pub fn new(terminal_size: (u16, u16), settings: Settings) -> Self {
        let Settings { config, syntaxes } = settings;
        Self {
            buffer: EditorBuffer::new(config.tab_stop),
            viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(FOOTER_ROWS),
            ),
            rx: 0,
            filename: None,
            config,
            syntaxes,
            status: None,
            quit_counter: 0,
            prompt: None,
            search: None,
            pending_save: false,
            should_quit: false,
        }
    }

    /// Load `path` into the buffer.
    ///
    /// A file that does not exist yet leaves the buffer empty with the
    /// filename set, so the first save creates it.
    ///
    /// # Errors
    /// Returns [`FileError::Read`] if the file exists but cannot be read.
    pub fn open_file(&mut self, path: &Path) -> Result<(), FileError> {
        self.filename = Some(path.to_path_buf());
        let syntax = self.select_syntax();
        let text = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "new file");
                String::new()
            }
            Err(source) => {
                return Err(FileError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.buffer = EditorBuffer::from_text(&text, self.config.tab_stop, syntax);
        tracing::info!(
            path = %path.display(),
            rows = self.buffer.line_count(),
            "opened file"
        );
        self.scroll();
        Ok(())
    }

    /// Write the buffer to its file, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns [`FileError::NoFilename`] before a filename is set, or
    /// [`FileError::Write`] if the write fails. The buffer is untouched on error.
    pub fn save(&mut self) -> Result<usize, FileError> {
        let path = self.filename.clone().ok_or(FileError::NoFilename)?;
        let text = self.buffer.text();
        std::fs::write(&path, &text).map_err(|source| FileError::Write {
            path: path.clone(),
            source,
        })?;
        self.buffer.mark_clean();
        tracing::info!(path = %path.display(), bytes = text.len(), "saved file");
        Ok(text.len())
    }

    /// Definition matching the current filename, if any.
    pub fn select_syntax(&self) -> Option<Arc<Syntax>> {
        let name = self.filename.as_ref()?.to_string_lossy();
        let syntax = select_syntax(&name, &self.syntaxes);
        tracing::debug!(
            filename = %name,
            filetype = syntax.as_ref().map(|s| s.filetype.as_str()),
            "selected syntax"
        );
        syntax
    }

    /// Re-select the syntax for the current filename and re-highlight.
    pub fn refresh_syntax(&mut self) {
        self.restore_search_overlay();
        let syntax = self.select_syntax();
        self.buffer.set_syntax(syntax);
    }

    /// Swap in freshly loaded configuration.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.restore_search_overlay();
        self.config = settings.config;
        self.syntaxes = settings.syntaxes;
        self.buffer.set_tab_stop(self.config.tab_stop);
        self.refresh_syntax();
        self.scroll();
    }

    /// Recompute the rendered cursor column and keep it on screen.
    pub fn scroll(&mut self) {
        let cursor = self.buffer.cursor();
        self.rx = self
            .buffer
            .row(cursor.row)
            .map_or(0, |row| row.cx_to_rx(cursor.col, self.buffer.tab_stop()));
        self.viewport.follow(cursor.row, self.rx);
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    /// Last status message, regardless of age.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// The status message if it is still within its display window at `now`.
    pub fn status_message_at(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|status| now.saturating_duration_since(status.set_at) < STATUS_MESSAGE_TTL)
            .map(|status| status.text.as_str())
    }

    /// Name of the active filetype for the status bar.
    pub fn filetype(&self) -> Option<&str> {
        self.buffer.syntax().map(|syntax| syntax.filetype.as_str())
    }

    pub const fn search_active(&self) -> bool {
        self.search.is_some()
    }

    // --- Prompt and search plumbing used by update ---

    pub(super) fn open_prompt(&mut self, kind: PromptKind) {
        let prompt = Prompt::new(kind);
        self.set_status(prompt.status_line());
        if kind == PromptKind::Find {
            self.search = Some(SearchSession::new(SavedView {
                cursor: self.buffer.cursor(),
                row_offset: self.viewport.row_offset(),
                col_offset: self.viewport.col_offset(),
            }));
        }
        self.prompt = Some(prompt);
    }

    pub(super) fn refresh_prompt_status(&mut self) {
        if let Some(line) = self.prompt.as_ref().map(Prompt::status_line) {
            self.set_status(line);
        }
    }

    /// Run one incremental search step for the current prompt input.
    pub(super) fn search_step(&mut self, key: SearchKey) -> Option<SearchMatch> {
        let query = self.prompt.as_ref()?.input.clone();
        let session = self.search.as_mut()?;
        let found = session.step(&mut self.buffer, &query, key);
        if let Some(found) = found {
            self.viewport.snap_to_row(found.row);
        }
        found
    }

    pub(super) fn finish_search(&mut self, accept: bool) {
        let Some(session) = self.search.take() else {
            return;
        };
        if accept {
            session.confirm(&mut self.buffer);
        } else {
            let saved = session.cancel(&mut self.buffer);
            self.viewport.set_offsets(saved.row_offset, saved.col_offset);
        }
    }

    fn restore_search_overlay(&mut self) {
        if let Some(session) = self.search.as_mut() {
            session.restore_overlay(&mut self.buffer);
        }
    }

    /// Move to the top of the screen, then one screen up.
    pub(super) fn page_up(&mut self) {
        let col = self.buffer.cursor().col;
        self.buffer
            .set_cursor(Cursor::at(self.viewport.row_offset(), col));
        for _ in 0..self.viewport.height() {
            self.buffer.move_cursor(crate::editor::Direction::Up);
        }
    }

    /// Move to the bottom of the screen, then one screen down.
    pub(super) fn page_down(&mut self) {
        let col = self.buffer.cursor().col;
        let bottom = (self.viewport.row_offset() + usize::from(self.viewport.height()))
            .saturating_sub(1)
            .min(self.buffer.line_count());
        self.buffer.set_cursor(Cursor::at(bottom, col));
        for _ in 0..self.viewport.height() {
            self.buffer.move_cursor(crate::editor::Direction::Down);
        }
    }
}
