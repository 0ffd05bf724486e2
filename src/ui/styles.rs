// Allow dead code: Style functions defined for consistent UI
#![allow(dead_code)]

use ratatui::style::{Color, Modifier, Style};

use crate::models::MovementAction;

// Color palette
pub const PRIMARY: Color = Color::Rgb(72, 128, 208);
pub const SECONDARY: Color = Color::Rgb(96, 176, 96);
pub const ACCENT: Color = Color::Rgb(80, 168, 160);
pub const ERROR: Color = Color::Rgb(208, 72, 72);
pub const WARNING: Color = Color::Rgb(200, 168, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn warning_style() -> Style {
    Style::default().fg(WARNING)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

/// Entries render green, exits red, matching their movement direction
pub fn action_style(action: MovementAction) -> Style {
    match action {
        MovementAction::Entry => success_style(),
        MovementAction::Exit => error_style(),
    }
}

/// Positive balances render green, zero or negative red
pub fn balance_style(balance: i64) -> Style {
    if balance > 0 {
        success_style().add_modifier(Modifier::BOLD)
    } else {
        error_style().add_modifier(Modifier::BOLD)
    }
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}
