//! View-specific content rendering.
//!
//! One module per screen: the dashboard home, the stock balance, the
//! entry/exit movement forms, the order history and the planning report.

pub mod balance;
pub mod history;
pub mod home;
pub mod movement;
pub mod planning;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;

/// Placeholder panel shown while a view's data has not arrived yet
pub(super) fn render_loading(frame: &mut Frame, area: Rect, title: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph =
        Paragraph::new(Line::from(Span::styled("Loading...", styles::muted_style()))).block(block);
    frame.render_widget(paragraph, area);
}
