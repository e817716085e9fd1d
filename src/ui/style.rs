//! Theming and color definitions.
//!
//! Highlight tags map to ANSI SGR foreground codes through the configured
//! [`ColorPalette`], so colors follow the terminal's own palette.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ColorPalette;
use crate::highlight::Highlight;

/// Translate an SGR foreground code (30-37, 90-97) to a ratatui color.
///
/// Unknown codes fall back to the terminal default.
pub const fn ansi_color(code: u8) -> Color {
    match code {
        30 => Color::Black,
        31 => Color::Red,
        32 => Color::Green,
        33 => Color::Yellow,
        34 => Color::Blue,
        35 => Color::Magenta,
        36 => Color::Cyan,
        37 => Color::Gray,
        90 => Color::DarkGray,
        91 => Color::LightRed,
        92 => Color::LightGreen,
        93 => Color::LightYellow,
        94 => Color::LightBlue,
        95 => Color::LightMagenta,
        96 => Color::LightCyan,
        97 => Color::White,
        _ => Color::Reset,
    }
}

/// Style for a character tagged `highlight`.
pub fn style_for(highlight: Highlight, palette: &ColorPalette) -> Style {
    Style::default().fg(ansi_color(palette.code_for(highlight)))
}

/// Control characters are drawn as a reverse-video substitute glyph.
pub fn control_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Reverse-video status bar.
pub fn status_bar_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}
