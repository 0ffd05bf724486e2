//! Entry and exit views - the movement form and its cart.
//!
//! Both directions share one form; only the action, title and accent color
//! differ. Items are staged in a per-view cart and submitted as one batch.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, MovementFocus};
use crate::models::MovementAction;
use crate::ui::styles;

pub fn render_entry(frame: &mut Frame, app: &App, area: Rect) {
    render(frame, app, area, MovementAction::Entry);
}

pub fn render_exit(frame: &mut Frame, app: &App, area: Rect) {
    render(frame, app, area, MovementAction::Exit);
}

fn render(frame: &mut Frame, app: &App, area: Rect, action: MovementAction) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_form(frame, app, chunks[0], action);
    render_cart(frame, app, chunks[1], action);
}

/// Selector line like "Tipo:  ◄ Macacão ►", highlighted when focused
fn selector_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let value_style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), styles::muted_style()),
        Span::styled(format!("◄ {} ►", value), value_style),
    ])
}

fn render_form(frame: &mut Frame, app: &App, area: Rect, action: MovementAction) {
    let kind = app.selected_kind();
    let mut lines = vec![Line::from("")];

    lines.push(selector_line(
        "Tipo:",
        kind.to_string(),
        app.movement_focus == MovementFocus::Kind,
    ));

    // Kinds without sizes show a fixed placeholder instead of the selector
    if kind.requires_size() {
        lines.push(selector_line(
            "Tamanho:",
            app.selected_size().to_string(),
            app.movement_focus == MovementFocus::Size,
        ));
    } else {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", "Tamanho:"), styles::muted_style()),
            Span::styled("Padrão", styles::muted_style()),
        ]));
    }

    let quantity_focused = app.movement_focus == MovementFocus::Quantity;
    let quantity_style = if quantity_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if quantity_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<12}", "Quantidade:"), styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(
            format!("{:<5}", format!("{}{}", app.quantity_input, cursor)),
            quantity_style,
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.movement_focus == MovementFocus::Add;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            if button_focused {
                " ▶ Adicionar ◀ "
            } else {
                "   Adicionar   "
            },
            button_style,
        ),
    ]));

    if let Some(ref error) = app.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  ←/→ change value, Tab next field",
        styles::muted_style(),
    )));
    lines.push(Line::from(Span::styled(
        "  Enter adds the line to the cart",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(format!(" Nova {} ", action.label()))
        .title_style(styles::action_style(action))
        .borders(Borders::ALL)
        .border_style(styles::border_style(
            app.movement_focus != MovementFocus::Cart,
        ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cart(frame: &mut Frame, app: &App, area: Rect, action: MovementAction) {
    let cart = app.active_cart();
    let cart_focused = app.movement_focus == MovementFocus::Cart;
    let mut lines = vec![Line::from("")];

    if cart.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Cart is empty. Add items on the left.",
            styles::muted_style(),
        )));
    } else {
        for (i, item) in cart.iter().enumerate() {
            let style = if cart_focused && i == app.cart_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::action_style(action)),
                Span::styled(item.describe(), style),
            ]));
        }

        let total: u32 = cart.iter().map(|item| item.quantity).sum();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Total: ", styles::muted_style()),
            Span::styled(
                format!("{} unidades", total),
                styles::list_item_style(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [s] ", styles::help_key_style()),
        Span::styled(
            format!("Confirmar {}", action.label()),
            styles::action_style(action),
        ),
        Span::styled("   [d] ", styles::help_key_style()),
        Span::styled("Remove line", styles::help_desc_style()),
    ]));

    let block = Block::default()
        .title(format!(" Carrinho ({}) ", cart.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(cart_focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
