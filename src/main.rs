//! SICRO TUI - a terminal client for the sterile garment stockroom.
//!
//! This application provides a fast, keyboard-driven interface for the
//! SICRO inventory API: stock balances, entry and exit registration,
//! movement history and consumption planning.

mod app;
mod auth;
mod api;
mod config;
mod models;
mod report;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use auth::CredentialStore;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the data directory
const LOG_FILE: &str = "sicro.log";

/// Initialize the tracing subscriber. Log lines go to a file under the data
/// directory; stderr belongs to the alternate screen while the TUI runs.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let data_dir = config::Config::data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_cli().await;
    }

    // Initialize logging; the guard flushes pending lines on drop
    let _guard = init_tracing();
    info!("SICRO TUI starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let app = App::new().await;

    // Main loop
    let result = match app {
        Ok(mut app) => run_app(&mut terminal, &mut app).await,
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("SICRO TUI shutting down");
    Ok(())
}

/// Interactive login for terminals without the TUI. Stores the session and
/// credentials so the next launch lands on the home view already signed in.
async fn login_cli() -> Result<()> {
    use std::io::Write;

    use auth::{Session, SessionData};

    println!("\n=== SICRO Login ===\n");

    let mut config = config::Config::load().unwrap_or_default();

    let username = if let Some(ref last_user) = config.last_username {
        print!("Username [{}]: ", last_user);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            last_user.clone()
        } else {
            input.to_string()
        }
    } else {
        prompt_username()?
    };

    let password = if CredentialStore::has_saved(&username) {
        print!("Use stored password? [Y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "n" {
            CredentialStore::password_for(&username)?
        } else {
            rpassword::prompt_password("Password: ")?
        }
    } else {
        rpassword::prompt_password("Password: ")?
    };

    println!("\nAuthenticating...");

    let api = api::ApiClient::new(&config.api_url())?;
    let grant = api.login(&username, &password).await?;

    if let Err(e) = CredentialStore::store(&username, &password) {
        eprintln!("Warning: could not store credentials: {}", e);
    }

    config.last_username = Some(username.clone());
    config.save()?;

    let session = Session::new(config::Config::data_dir()?);
    session.establish(SessionData {
        access_token: grant.access_token,
        expires_at: grant.expires_in,
        username: Some(username),
        role: grant.role,
    });

    println!("Login successful!\n");
    Ok(())
}

fn prompt_username() -> Result<String> {
    use std::io::Write;

    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
