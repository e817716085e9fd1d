use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::editor::char_width;

use super::style;

/// Left and right halves of the status bar.
pub fn status_bar_text(model: &Model) -> (String, String) {
    let filename = model
        .filename
        .as_ref()
        .map_or_else(|| "[No Name]".to_string(), |path| path.display().to_string());
    let dirty = if model.buffer.is_dirty() { "(modified)" } else { "" };
    let lines = model.buffer.line_count();
    let left = format!("{filename:.35} - {lines} lines {dirty}");
    let right = format!(
        "{} | {}/{}",
        model.filetype().unwrap_or("no filetype"),
        model.buffer.cursor().row + 1,
        lines
    );
    (left, right)
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let width = usize::from(area.width);
    let (left, right) = status_bar_text(model);
    let left = truncate_to_width(&left, width);
    let left_width = left.width();

    let mut text = left;
    if width.saturating_sub(left_width) >= right.width() {
        let gap = width - left_width - right.width();
        text.push_str(&" ".repeat(gap));
        text.push_str(&right);
    }

    let bar = Paragraph::new(text).style(style::status_bar_style());
    frame.render_widget(bar, area);
}

pub fn render_message_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(message) = model.status_message_at(Instant::now()) else {
        return;
    };
    let text = truncate_to_width(message, usize::from(area.width));
    frame.render_widget(Paragraph::new(text), area);
}

/// Longest prefix of `text` that fits in `width` cells.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|&c| {
            used += char_width(c);
            used <= width
        })
        .collect()
}
