//! Balance view - current stock grouped by garment kind.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{display_size, KindBalance};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref groups) = app.balance else {
        super::render_loading(frame, area, "Saldo de Estoque");
        return;
    };

    if groups.is_empty() {
        let block = Block::default()
            .title(" Saldo de Estoque ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        let paragraph =
            Paragraph::new(Span::styled("No stock recorded", styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // One column per kind, in the order the server sent them
    let constraints: Vec<Constraint> =
        vec![Constraint::Ratio(1, groups.len() as u32); groups.len()];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (group, chunk) in groups.iter().zip(chunks.iter()) {
        render_kind_panel(frame, group, *chunk);
    }
}

fn render_kind_panel(frame: &mut Frame, group: &KindBalance, area: Rect) {
    let mut lines = Vec::new();
    let mut total: i64 = 0;

    for entry in &group.entries {
        total += entry.balance;
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<8}", display_size(entry.size.as_deref())),
                styles::list_item_style(),
            ),
            Span::styled(
                format!("{:>6}", entry.balance),
                styles::balance_style(entry.balance),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Total   ", styles::muted_style()),
        Span::styled(format!("{:>6}", total), styles::balance_style(total)),
    ]));

    let block = Block::default()
        .title(format!(" {} ", group.kind))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
