//! Planning view - weekly consumption per size and the slow-mover list.
//!
//! Both tables come from the planning endpoint. The slow-mover list can be
//! exported as CSV or as a printable report from this view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::models::PlanningData;
use crate::ui::styles;

use super::render_loading;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.planning else {
        render_loading(frame, area, "Planejamento");
        return;
    };

    // Consumption is one row per kind; give the rest to the slow movers
    let consumption_height = (data.consumption.len() as u16 + 4).min(area.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(consumption_height),
            Constraint::Min(5),
        ])
        .split(area);

    render_consumption(frame, data, chunks[0]);
    render_slow_movers(frame, data, chunks[1]);
}

fn render_consumption(frame: &mut Frame, data: &PlanningData, area: Rect) {
    let block = Block::default()
        .title(" Consumo Médio Semanal ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if data.consumption.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No consumption data",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut header_cells = vec![Cell::from("Tipo")];
    for label in &data.size_labels {
        header_cells.push(Cell::from(format!("{:>7}", label)));
    }
    header_cells.push(Cell::from(format!("{:>7}", "Total")));
    let header = Row::new(header_cells)
        .style(styles::highlight_style())
        .height(1);

    let rows: Vec<Row> = data
        .consumption
        .iter()
        .map(|point| {
            let mut cells = vec![Cell::from(point.name.clone())];
            for label in &data.size_labels {
                cells.push(Cell::from(Span::styled(
                    format!("{:>7.1}", point.value_for(label)),
                    styles::list_item_style(),
                )));
            }
            cells.push(Cell::from(Span::styled(
                format!("{:>7.1}", point.total()),
                styles::highlight_style(),
            )));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(std::iter::repeat(Constraint::Length(7)).take(data.size_labels.len()));
    widths.push(Constraint::Length(7));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_slow_movers(frame: &mut Frame, data: &PlanningData, area: Rect) {
    let title = format!(
        " Itens Menos Movimentados ({}) - [x] CSV [p] Report ",
        data.slow_movers.len()
    );
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if data.slow_movers.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No slow-moving items",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Item"),
        Cell::from(format!("{:>13}", "Saídas (30d)")),
        Cell::from(format!("{:>15}", "Estoque Parado")),
    ])
    .style(styles::highlight_style())
    .height(1);

    let rows: Vec<Row> = data
        .slow_movers
        .iter()
        .map(|mover| {
            Row::new(vec![
                Cell::from(mover.item.clone()),
                Cell::from(Span::styled(
                    format!("{:>13}", mover.exits_30d),
                    styles::warning_style(),
                )),
                Cell::from(Span::styled(
                    format!("{:>15}", mover.idle_stock),
                    Style::default().fg(styles::PRIMARY),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Length(15),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
