use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, View, MAIN_VIEWS};

use super::styles;
use super::views::{balance, history, home, movement, planning};

pub fn render(frame: &mut Frame, app: &App) {
    // The login view owns the whole screen; no chrome until authenticated
    if app.view == View::Login {
        render_login_screen(frame, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  SICRO";
    let help_hint = "[?] Help";

    let user_info = match app.session.username() {
        Some(user) if app.is_admin() => format!("{} (admin)", user),
        Some(user) => user,
        None => String::new(),
    };
    let right = if user_info.is_empty() {
        help_hint.to_string()
    } else {
        format!("{}  {}", user_info, help_hint)
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.chars().count() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, view) in MAIN_VIEWS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, view.title());
        if *view == app.view {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Login => {}
        View::Home => home::render(frame, app, area),
        View::Balance => balance::render(frame, app, area),
        View::Entry => movement::render_entry(frame, app, area),
        View::Exit => movement::render_exit(frame, app, area),
        View::History => history::render(frame, app, area),
        View::Planning => planning::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[u]pdate | [L]ogout | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.session.minutes_until_expiry() {
            Some(minutes) if minutes > 0 => format!(" Session expires in {}m ", minutes),
            _ => " Ready ".to_string(),
        }
    };

    let right_text = format!(" {} ", shortcuts);

    // Server messages arrive in Portuguese, so byte lengths over-count
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_login_screen(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 16 } else { 14 };
    let area = centered_rect_fixed(46, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = vec![];

    // ASCII Art Logo (centered for 46-width box, 44 interior)
    lines.push(Line::from(Span::styled(
        "               ╔═╗╦╔═╗╦═╗╔═╗",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "               ╚═╗║║  ╠╦╝║ ║",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "               ╚═╝╩╚═╝╩╚═╚═╝",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "   Sistema de Controle de Roupas Estéreis",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    // Username field (centered: 46 width - 2 borders = 44 interior)
    let username_focused = app.login_focus == LoginFocus::Username;
    let username_style = if username_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let username_display = format!("{:<16}", app.login_username);
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Usuário: [", styles::muted_style()),
        Span::styled(format!("{}{}", username_display, cursor), username_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field (centered)
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let password_masked: String = "*".repeat(app.login_password.chars().count().min(16));
    let password_display = format!("{:<16}", password_masked);
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Senha:   [", styles::muted_style()),
        Span::styled(format!("{}{}", password_display, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button (centered)
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(""));
    if button_focused {
        lines.push(Line::from(vec![
            Span::raw("            ["),
            Span::styled(" ▶ Entrar ◀ ", button_style),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("            ["),
            Span::styled("   Entrar   ", button_style),
            Span::raw("]"),
        ]));
    }

    // Error message
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, _app: &App) {
    // Fixed size dialog matching login/quit overlays
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        // ASCII Art Logo (centered for 52-width box, 50 interior)
        Line::from(Span::styled(
            "                  ╔═╗╦╔═╗╦═╗╔═╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "                  ╚═╗║║  ╠╦╝║ ║",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "                  ╚═╝╩╚═╝╩╚═╚═╝",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("                  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-6       ", styles::help_key_style()),
            Span::styled("Switch views", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", styles::help_key_style()),
            Span::styled("Prev/next view, or change a selector", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Tab       ", styles::help_key_style()),
            Span::styled("Next form field", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓       ", styles::help_key_style()),
            Span::styled("Navigate list", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", styles::help_key_style()),
            Span::styled("Confirm / expand order items", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Refresh the current view", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  s         ", styles::help_key_style()),
            Span::styled("Submit the movement cart", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", styles::help_key_style()),
            Span::styled("Remove the selected cart line", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  x / p     ", styles::help_key_style()),
            Span::styled("Export planning CSV / report", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  L         ", styles::help_key_style()),
            Span::styled("Log out", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    // Fixed size dialog matching login screen
    let area = centered_rect_fixed(46, 10, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "               ╔═╗╦╔═╗╦═╗╔═╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "               ╚═╗║║  ╠╦╝║ ║",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "               ╚═╝╩╚═╝╩╚═╚═╝",
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
