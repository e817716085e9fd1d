use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if model.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(Message::PromptSubmit),
                KeyCode::Backspace | KeyCode::Delete => Some(Message::PromptBackspace),
                KeyCode::Char('h') if ctrl => Some(Message::PromptBackspace),
                KeyCode::Right | KeyCode::Down => Some(Message::PromptNext),
                KeyCode::Left | KeyCode::Up => Some(Message::PromptPrevious),
                KeyCode::Char(c) if !ctrl && !alt && !c.is_control() => {
                    Some(Message::PromptInput(c))
                }
                _ => None,
            };
        }

        if ctrl {
            return match key.code {
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('f') => Some(Message::Find),
                KeyCode::Char('d') => Some(Message::DeleteLine),
                KeyCode::Char('h') => Some(Message::Backspace),
                KeyCode::Char('l') => Some(Message::Redraw),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::Backspace),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Up => Some(Message::Move(Direction::Up)),
            KeyCode::Down => Some(Message::Move(Direction::Down)),
            KeyCode::Left => Some(Message::Move(Direction::Left)),
            KeyCode::Right => Some(Message::Move(Direction::Right)),
            KeyCode::Home => Some(Message::Home),
            KeyCode::End => Some(Message::End),
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Tab => Some(Message::InsertChar('\t')),
            KeyCode::Esc => Some(Message::Redraw),
            KeyCode::Char(c) if !alt => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
