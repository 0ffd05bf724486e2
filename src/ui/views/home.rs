//! Home view - welcome line plus the month-to-date movement summary.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format_signed;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Welcome line
            Constraint::Length(5), // Monthly totals
            Constraint::Min(5),    // Outflow ranking
        ])
        .split(area);

    render_welcome(frame, app, chunks[0]);

    let Some(ref summary) = app.summary else {
        super::render_loading(frame, chunks[1], "Resumo do Mês");
        return;
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    render_card(
        frame,
        cards[0],
        "Entradas",
        summary.entries.to_string(),
        styles::success_style(),
    );
    render_card(
        frame,
        cards[1],
        "Saídas",
        summary.exits.to_string(),
        styles::error_style(),
    );
    render_card(
        frame,
        cards[2],
        "Balanço Líquido",
        format_signed(summary.net_balance),
        styles::balance_style(summary.net_balance),
    );

    render_ranking(frame, app, chunks[2]);
}

fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
    let user = app.session.username().unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("  Bem-vindo, ", styles::list_item_style()),
        Span::styled(user, styles::highlight_style()),
        Span::styled(
            "! Escolha uma opção na barra acima.",
            styles::list_item_style(),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: String, style: ratatui::style::Style) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", value), style)),
    ];

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_ranking(frame: &mut Frame, app: &App, area: Rect) {
    let summary = match app.summary {
        Some(ref s) => s,
        None => return,
    };

    let header = Row::new([Cell::from("#"), Cell::from("Item"), Cell::from("Saídas")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = if summary.outflow_ranking.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from(Span::styled(
                "No exits recorded this month",
                styles::muted_style(),
            )),
            Cell::from(""),
        ])]
    } else {
        summary
            .outflow_ranking
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(entry.item.clone()),
                    Cell::from(format!("{:>6}", entry.quantity)),
                ])
                .style(styles::list_item_style())
            })
            .collect()
    };

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(8),
    ];

    let title = format!(" Ranking de Saídas - {} ", summary.reference_month);
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}
