use crate::app::Model;
use crate::app::model::PromptKind;
use crate::editor::Direction;
use crate::search::SearchKey;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Split line at cursor (Enter)
    InsertNewline,
    /// Delete character before cursor (Backspace)
    Backspace,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Remove the cursor row
    DeleteLine,

    // Navigation
    /// Move cursor in a direction
    Move(Direction),
    /// Move cursor to beginning of line
    Home,
    /// Move cursor to end of line
    End,
    /// Move cursor one screen up
    PageUp,
    /// Move cursor one screen down
    PageDown,

    // Commands
    /// Write the buffer, prompting for a filename first if needed
    Save,
    /// Start incremental search
    Find,
    /// Quit, subject to the unsaved-changes confirmation
    Quit,

    // Prompt
    /// Append a character to the prompt input
    PromptInput(char),
    /// Remove the last prompt character
    PromptBackspace,
    /// Jump to the next search match
    PromptNext,
    /// Jump to the previous search match
    PromptPrevious,
    /// Accept the prompt input
    PromptSubmit,
    /// Abort the prompt
    PromptCancel,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Configuration files changed on disk
    ConfigChanged,
    /// Redraw screen
    Redraw,
}

impl Message {
    /// Whether this message is a user command that ends a pending quit confirmation.
    const fn resets_quit_counter(&self) -> bool {
        !matches!(self, Self::Quit | Self::Resize(..) | Self::ConfigChanged)
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File I/O requested here is carried out by the event loop's effects.
pub fn update(mut model: Model, msg: Message) -> Model {
    if msg.resets_quit_counter() {
        model.quit_counter = 0;
    }

    match msg {
        // Editing
        Message::InsertChar(c) => model.buffer.insert_char(c),
        Message::InsertNewline => model.buffer.insert_newline(),
        Message::Backspace => {
            model.buffer.delete_back();
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::DeleteLine => model.buffer.delete_line(),

        // Navigation
        Message::Move(direction) => model.buffer.move_cursor(direction),
        Message::Home => model.buffer.move_home(),
        Message::End => model.buffer.move_end(),
        Message::PageUp => model.page_up(),
        Message::PageDown => model.page_down(),

        // Commands
        Message::Save => {
            if model.filename.is_some() {
                model.pending_save = true;
            } else {
                model.open_prompt(PromptKind::SaveAs);
            }
        }
        Message::Find => model.open_prompt(PromptKind::Find),
        Message::Quit => {
            let quit_times = model.config.quit_times;
            if model.buffer.is_dirty() && model.quit_counter < quit_times {
                model.set_status(format!(
                    "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    quit_times - model.quit_counter
                ));
                model.quit_counter += 1;
            } else {
                model.should_quit = true;
            }
        }

        // Prompt
        Message::PromptInput(c) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.push(c);
                model.refresh_prompt_status();
                model.search_step(SearchKey::Edit);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
                model.refresh_prompt_status();
                model.search_step(SearchKey::Edit);
            }
        }
        Message::PromptNext => {
            model.refresh_prompt_status();
            model.search_step(SearchKey::Next);
        }
        Message::PromptPrevious => {
            model.refresh_prompt_status();
            model.search_step(SearchKey::Previous);
        }
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::PromptCancel => {
            if let Some(prompt) = model.prompt.take() {
                match prompt.kind {
                    PromptKind::SaveAs => model.set_status("Save aborted"),
                    PromptKind::Find => {
                        model.finish_search(false);
                        model.set_status("");
                    }
                }
            }
        }

        // Window
        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, height.saturating_sub(super::model::FOOTER_ROWS));
        }
        // ConfigChanged: reloaded in effects (file I/O)
        // Redraw: no state change needed
        Message::ConfigChanged | Message::Redraw => {}
    }

    model.scroll();
    model
}

fn submit_prompt(model: &mut Model) {
    let Some(prompt) = model.prompt.as_ref() else {
        return;
    };
    if prompt.input.is_empty() {
        return;
    }
    let Some(prompt) = model.prompt.take() else {
        return;
    };
    model.set_status("");
    match prompt.kind {
        PromptKind::SaveAs => {
            model.filename = Some(prompt.input.into());
            model.refresh_syntax();
            model.pending_save = true;
        }
        PromptKind::Find => model.finish_search(true),
    }
}
