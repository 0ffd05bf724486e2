//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_password_char, can_add_username_char, App, AppState, LoginFocus, MovementFocus, View,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // The login form owns every key until a session exists
    if app.view == View::Login {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // While the quantity field is focused, digits edit it instead of
    // switching views
    if app.view.movement_action().is_some() && app.movement_focus == MovementFocus::Quantity {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                app.push_quantity_char(c);
                return Ok(false);
            }
            KeyCode::Backspace => {
                app.pop_quantity_char();
                return Ok(false);
            }
            _ => {}
        }
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => app.navigate(View::Home),
        KeyCode::Char('2') => app.navigate(View::Balance),
        KeyCode::Char('3') => app.navigate(View::Entry),
        KeyCode::Char('4') => app.navigate(View::Exit),
        KeyCode::Char('5') => app.navigate(View::History),
        KeyCode::Char('6') => app.navigate(View::Planning),
        KeyCode::Left => {
            // On a movement form the arrows drive the focused selector
            if app.view.movement_action().is_some() {
                match app.movement_focus {
                    MovementFocus::Kind => app.cycle_kind(false),
                    MovementFocus::Size => app.cycle_size(false),
                    _ => app.navigate(app.view.prev()),
                }
            } else {
                app.navigate(app.view.prev());
            }
        }
        KeyCode::Right => {
            if app.view.movement_action().is_some() {
                match app.movement_focus {
                    MovementFocus::Kind => app.cycle_kind(true),
                    MovementFocus::Size => app.cycle_size(true),
                    _ => app.navigate(app.view.next()),
                }
            } else {
                app.navigate(app.view.next());
            }
        }
        KeyCode::Char('u') => {
            app.refresh_view_data(app.view);
        }
        KeyCode::Char('L') => {
            app.logout();
        }
        KeyCode::Tab => {
            if app.view.movement_action().is_some() {
                app.focus_next_field();
            }
        }
        KeyCode::BackTab => {
            if app.view.movement_action().is_some() {
                app.focus_prev_field();
            }
        }
        KeyCode::Esc => {
            if app.view == View::History {
                app.history_expanded = None;
            } else if app.view.movement_action().is_some() {
                app.form_error = None;
            }
        }
        _ => {
            // View-specific input
            match app.view {
                View::Entry | View::Exit => handle_movement_input(app, key).await?,
                View::History => handle_history_input(app, key).await?,
                View::Planning => handle_planning_input(app, key).await?,
                _ => {}
            }
        }
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            // Move to next field
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            // Move to previous field
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => {
            match app.login_focus {
                LoginFocus::Username => {
                    // Move to password
                    app.login_focus = LoginFocus::Password;
                }
                LoginFocus::Password => {
                    // Move to button
                    app.login_focus = LoginFocus::Button;
                }
                LoginFocus::Button => {
                    // Attempt login; on failure login_error is set
                    app.attempt_login().await;
                }
            }
        }
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {
                // Ignore character input on button
            }
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_movement_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let cart_len = app.active_cart().len();

    match key.code {
        // Enter walks the form like a wizard, then acts on the buttons
        KeyCode::Enter => match app.movement_focus {
            MovementFocus::Kind | MovementFocus::Size | MovementFocus::Quantity => {
                app.focus_next_field();
            }
            MovementFocus::Add => app.add_cart_item(),
            MovementFocus::Cart => app.submit_cart(),
        },
        KeyCode::Char('s') => {
            app.submit_cart();
        }
        KeyCode::Char('d') if app.movement_focus == MovementFocus::Cart => {
            app.remove_cart_item();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.movement_focus == MovementFocus::Cart {
                if cart_len > 0 {
                    app.cart_selection = (app.cart_selection + 1).min(cart_len - 1);
                }
            } else {
                app.focus_next_field();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.movement_focus == MovementFocus::Cart {
                app.cart_selection = app.cart_selection.saturating_sub(1);
            } else {
                app.focus_prev_field();
            }
        }
        _ => {}
    }
    Ok(())
}

async fn handle_history_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let max_index = app
        .history
        .as_ref()
        .map(|orders| orders.len())
        .unwrap_or(0)
        .saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next_order();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev_order();
        }
        KeyCode::Home => {
            app.history_selection = 0;
        }
        KeyCode::End => {
            app.history_selection = max_index;
        }
        KeyCode::PageDown => {
            app.page_down_history();
        }
        KeyCode::PageUp => {
            app.page_up_history();
        }
        KeyCode::Enter => {
            app.toggle_order_expanded();
        }
        _ => {}
    }
    Ok(())
}

async fn handle_planning_input(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('x') => {
            app.export_planning_csv();
        }
        KeyCode::Char('p') => {
            app.export_planning_report();
        }
        _ => {}
    }
    Ok(())
}
