use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{FOOTER_ROWS, Model};
use crate::editor::{Row, char_width};

use super::{VERSION, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let text_area = Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    };
    let status_area = Rect {
        y: area.y + text_area.height,
        height: area.height.saturating_sub(text_area.height).min(1),
        ..area
    };
    let message_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: u16::from(area.height >= FOOTER_ROWS),
        ..area
    };

    render_rows(model, frame, text_area);
    status::render_status_bar(model, frame, status_area);
    status::render_message_bar(model, frame, message_area);

    let cursor = model.buffer.cursor();
    let x = model.rx.saturating_sub(model.viewport.col_offset());
    let y = cursor.row.saturating_sub(model.viewport.row_offset());
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y))
        && x < text_area.width.max(1)
        && y < text_area.height.max(1)
    {
        frame.set_cursor_position((text_area.x + x, text_area.y + y));
    }
}

fn render_rows(model: &Model, frame: &mut Frame, area: Rect) {
    let width = usize::from(area.width);
    let col_offset = model.viewport.col_offset();
    let placeholder = model.config.empty_line_char.as_str();

    let lines: Vec<Line> = model
        .viewport
        .visible_rows()
        .take(usize::from(area.height))
        .enumerate()
        .map(|(y, filerow)| match model.buffer.row(filerow) {
            Some(row) => row_line(row, col_offset, width, &model.config.color_palette),
            None if model.buffer.is_empty() && y == usize::from(area.height) / 3 => {
                welcome_line(placeholder, width)
            }
            None => Line::raw(placeholder.to_string()),
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// The visible slice of one row, colored by its highlight tags.
pub fn row_line(
    row: &Row,
    col_offset: usize,
    width: usize,
    palette: &crate::config::ColorPalette,
) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut col = 0;
    let mut used = 0;

    for (c, &tag) in row.render().chars().zip(row.highlights()) {
        let w = char_width(c);
        let start = col;
        col += w;
        if start < col_offset {
            continue;
        }
        if used + w > width {
            break;
        }
        used += w;

        let (glyph, cell_style) = if c.is_control() {
            (control_glyph(c), style::control_style())
        } else {
            (c, style::style_for(tag, palette))
        };
        if cell_style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = cell_style;
        run.push(glyph);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

/// Substitute glyph for a control character: `@`+c below 26, else `?`.
pub fn control_glyph(c: char) -> char {
    let code = u32::from(c);
    if code < 26 {
        char::from_u32(u32::from('@') + code).unwrap_or('?')
    } else {
        '?'
    }
}

fn welcome_line(placeholder: &str, width: usize) -> Line<'static> {
    let message: String = format!("Cookie Text Editor - Version {VERSION}");
    let mut shown = String::new();
    let mut shown_width = 0;
    for c in message.chars() {
        let w = char_width(c);
        if shown_width + w > width {
            break;
        }
        shown.push(c);
        shown_width += w;
    }

    let mut padding = (width - shown_width) / 2;
    let mut text = String::new();
    if padding > 0 {
        text.push_str(placeholder);
        padding -= 1;
    }
    text.push_str(&" ".repeat(padding));
    text.push_str(&shown);
    Line::raw(text)
}
