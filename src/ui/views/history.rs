//! History view - movement orders, newest first, with an item detail panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::{MovementAction, MovementOrder};
use crate::ui::styles;
use crate::utils::{format_optional, format_timestamp};

use super::render_loading;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref orders) = app.history else {
        render_loading(frame, area, "Histórico de Movimentações");
        return;
    };

    if orders.is_empty() {
        let block = Block::default()
            .title(" Histórico de Movimentações ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No movements recorded",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // The detail panel only appears while an order is expanded
    let expanded = app
        .history_expanded
        .and_then(|idx| orders.get(idx).map(|order| (idx, order)));

    match expanded {
        Some((_, order)) => {
            let detail_height = (order.items.len() as u16 + 2).min(area.height / 2);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(detail_height)])
                .split(area);

            render_order_table(frame, app, orders, chunks[0]);
            render_order_items(frame, order, chunks[1]);
        }
        None => render_order_table(frame, app, orders, area),
    }
}

fn render_order_table(frame: &mut Frame, app: &App, orders: &[MovementOrder], area: Rect) {
    let header = Row::new(vec![
        Cell::from("Data"),
        Cell::from("Pedido"),
        Cell::from("Usuário"),
        Cell::from("Ação"),
        Cell::from("Itens"),
    ])
    .style(styles::highlight_style())
    .height(1);

    let rows: Vec<Row> = orders
        .iter()
        .map(|order| {
            // Unknown action strings pass through unstyled
            let action_cell = match MovementAction::from_wire(&order.action) {
                Some(action) => Cell::from(Span::styled(
                    action.label(),
                    styles::action_style(action),
                )),
                None => Cell::from(order.action.clone()),
            };

            Row::new(vec![
                Cell::from(format_timestamp(order.date.as_deref())),
                Cell::from(order.order_id.clone()),
                Cell::from(order.user.clone()),
                action_cell,
                Cell::from(format!("{:>5}", order.items.len())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16), // Data - dd/mm/yyyy HH:MM
        Constraint::Fill(2),    // Pedido
        Constraint::Fill(2),    // Usuário
        Constraint::Length(8),  // Ação
        Constraint::Length(5),  // Itens
    ];

    let title = format!(" Histórico ({}) - [Enter] items ", orders.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.history_selection.min(orders.len() - 1)));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_order_items(frame: &mut Frame, order: &MovementOrder, area: Rect) {
    let lines: Vec<Line> = order
        .items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(format!("  {:<12}", item.kind), styles::list_item_style()),
                Span::styled(
                    format!("{:<10}", format_optional(&item.size, "-")),
                    styles::muted_style(),
                ),
                Span::styled(format!("x{}", item.quantity), styles::list_item_style()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Itens - Pedido {} ", order.order_id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
