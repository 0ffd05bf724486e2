//! Application state management for the SICRO terminal client.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, loaded inventory data, session management, and background
//! task coordination.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, NavCommand, Session, SessionData};
use crate::config::Config;
use crate::models::{
    group_by_kind, group_orders, validate_batch, GarmentKind, KindBalance, MonthlySummary,
    MovementAction, MovementItem, MovementOrder, MovementReceipt, PlanningData, Size,
};
use crate::report;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces four results plus movement receipts; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
/// SICRO usernames are short operator logins, 50 chars covers all of them.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum digits for the quantity field.
/// Four digits covers any plausible hand count of garments.
const MAX_QUANTITY_DIGITS: usize = 4;

/// Number of orders to scroll on page up/down in the history view.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Screens the client can show. `Login` sits outside the main cycle; the
/// remaining six mirror the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Home,
    Balance,
    Entry,
    Exit,
    History,
    Planning,
}

/// The main views in navigation-bar order. Digit keys 1-6 map onto this.
pub const MAIN_VIEWS: [View; 6] = [
    View::Home,
    View::Balance,
    View::Entry,
    View::Exit,
    View::History,
    View::Planning,
];

impl View {
    /// Get the display title for this view.
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Home => "Home",
            View::Balance => "Saldo",
            View::Entry => "Entrada",
            View::Exit => "Saída",
            View::History => "Histórico",
            View::Planning => "Planejamento",
        }
    }

    /// Get the next main view (wrapping around). Login does not cycle.
    pub fn next(&self) -> Self {
        match self {
            View::Login => View::Login,
            View::Home => View::Balance,
            View::Balance => View::Entry,
            View::Entry => View::Exit,
            View::Exit => View::History,
            View::History => View::Planning,
            View::Planning => View::Home,
        }
    }

    /// Get the previous main view (wrapping around). Login does not cycle.
    pub fn prev(&self) -> Self {
        match self {
            View::Login => View::Login,
            View::Home => View::Planning,
            View::Balance => View::Home,
            View::Entry => View::Balance,
            View::Exit => View::Entry,
            View::History => View::Exit,
            View::Planning => View::History,
        }
    }

    /// The stock movement direction this view submits, if any.
    pub fn movement_action(&self) -> Option<MovementAction> {
        match self {
            View::Entry => Some(MovementAction::Entry),
            View::Exit => Some(MovementAction::Exit),
            _ => None,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Movement form focus state (entry and exit views)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementFocus {
    Kind,
    Size,
    Quantity,
    Add,
    Cart,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background fetch tasks.
///
/// These variants are sent through an MPSC channel from background tasks back
/// to the main application. Each variant represents a different type of data
/// that was fetched from the API.
enum FetchResult {
    /// Current stock balance, grouped by garment kind
    Balance(Vec<KindBalance>),
    /// Movement history, grouped into orders
    History(Vec<MovementOrder>),
    /// Monthly dashboard summary
    Summary(MonthlySummary),
    /// Strategic planning data (slow movers, consumption series)
    Planning(PlanningData),
    /// A movement batch was accepted by the server
    MovementRegistered(MovementAction, MovementReceipt),
    /// The session could not be renewed; the user must log in again
    SessionExpired,
    /// An error occurred during a background task
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub view: View,
    pub status_message: Option<String>,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Movement form state (shared by the entry and exit views)
    pub movement_focus: MovementFocus,
    pub kind_selection: usize,
    pub size_selection: usize,
    pub quantity_input: String,
    pub entry_cart: Vec<MovementItem>,
    pub exit_cart: Vec<MovementItem>,
    pub cart_selection: usize,
    pub form_error: Option<String>,

    // Loaded data (None until the first fetch lands)
    pub balance: Option<Vec<KindBalance>>,
    pub history: Option<Vec<MovementOrder>>,
    pub summary: Option<MonthlySummary>,
    pub planning: Option<PlanningData>,

    // History view state
    pub history_selection: usize,
    pub history_expanded: Option<usize>,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance
    pub async fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = Config::data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, "Data directory configured");

        // Load session from disk if it exists
        let session = Session::new(data_dir);
        match session.load() {
            Ok(found) => debug!(found, "Session loaded"),
            Err(e) => warn!(error = %e, "Failed to load session"),
        }

        let api = ApiClient::new(&config.api_url())?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill credentials from env vars or the last successful login
        let login_username = std::env::var("SICRO_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("SICRO_PASSWORD").unwrap_or_default();

        // Startup lands on the root route; the gate decides between the
        // home screen and the login form
        let view = match session.authorize_route(true) {
            NavCommand::RedirectToHome | NavCommand::Proceed => View::Home,
            NavCommand::RedirectToLogin => View::Login,
        };

        let login_focus = if login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };

        let mut app = Self {
            config,
            session,
            api,

            state: AppState::Normal,
            view,
            status_message: None,

            login_username,
            login_password,
            login_focus,
            login_error: None,

            movement_focus: MovementFocus::Kind,
            kind_selection: 0,
            size_selection: 0,
            quantity_input: String::from("1"),
            entry_cart: Vec::new(),
            exit_cart: Vec::new(),
            cart_selection: 0,
            form_error: None,

            balance: None,
            history: None,
            summary: None,
            planning: None,

            history_selection: 0,
            history_expanded: None,

            fetch_rx: rx,
            fetch_tx: tx,
        };

        if app.view == View::Home {
            app.refresh_all_background();
        }

        Ok(app)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Whether the current session grants stock movement rights.
    pub fn is_admin(&self) -> bool {
        self.session.role().as_deref() == Some("admin")
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;
        self.status_message = Some("Authenticating...".to_string());

        match self.api.login(&username, &password).await {
            Ok(grant) => {
                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session.establish(SessionData {
                    access_token: grant.access_token,
                    expires_at: grant.expires_in,
                    username: Some(username),
                    role: grant.role,
                });

                self.login_password.clear();
                self.status_message = None;
                self.view = View::Home;
                info!("Login successful");
                self.refresh_all_background();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let user_message = match &e {
                    ApiError::Unauthorized => "Invalid username or password".to_string(),
                    ApiError::NetworkError(err) if err.is_timeout() => {
                        "Connection timed out. Please try again.".to_string()
                    }
                    ApiError::NetworkError(_) => {
                        "Unable to connect to server. Check your internet connection.".to_string()
                    }
                    other => format!("Login failed: {}", other),
                };
                self.login_error = Some(user_message);
                self.status_message = None;
            }
        }
    }

    /// Log out: tell the server to drop the refresh cookie, then clear all
    /// local session state. The request is best-effort; local state goes
    /// regardless of whether the server answered.
    pub fn logout(&mut self) {
        info!("Logging out");
        let api = self.api.clone();
        tokio::spawn(async move {
            if let Err(e) = api.logout().await {
                debug!(error = %e, "Logout request failed");
            }
        });

        self.session.clear();
        self.reset_to_login();
        self.login_error = None;
        self.status_message = Some("Logged out".to_string());
    }

    /// Drop loaded data and return to the login screen. The session itself
    /// has already been cleared by whoever called this.
    fn reset_to_login(&mut self) {
        self.balance = None;
        self.history = None;
        self.summary = None;
        self.planning = None;

        self.entry_cart.clear();
        self.exit_cart.clear();
        self.cart_selection = 0;
        self.form_error = None;
        self.movement_focus = MovementFocus::Kind;

        self.history_selection = 0;
        self.history_expanded = None;

        self.login_password.clear();
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };

        self.view = View::Login;
        self.state = AppState::Normal;
    }

    /// Force the user back to the login screen with an explanation.
    fn force_login(&mut self, reason: &str) {
        self.reset_to_login();
        self.login_error = Some(reason.to_string());
        self.status_message = None;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to a view, subject to the route gate. An expired session bounces
    /// straight to the login screen; a live session keeps the user out of it.
    pub fn navigate(&mut self, target: View) {
        if target == View::Login {
            if self.session.is_valid() {
                self.view = View::Home;
            } else {
                self.view = View::Login;
            }
            return;
        }

        match self.session.authorize_route(false) {
            NavCommand::Proceed => {
                self.view = target;
                self.spawn_fetch(target);
            }
            NavCommand::RedirectToHome => {
                self.view = View::Home;
            }
            NavCommand::RedirectToLogin => {
                warn!("Route gate rejected navigation, session is gone");
                self.force_login("Session expired. Please log in again.");
            }
        }
    }

    // =========================================================================
    // Background Fetching
    // =========================================================================

    /// Fetch everything the main views need in one background task.
    pub fn refresh_all_background(&mut self) {
        if !self.session.is_valid() {
            debug!("Skipping refresh, no valid session");
            return;
        }

        let api = self.api.clone();
        let session = self.session.clone();
        let tx = self.fetch_tx.clone();

        info!("Starting background refresh");
        tokio::spawn(async move {
            let (balance, history, summary, planning) = tokio::join!(
                api.fetch_balance(&session),
                api.fetch_history(&session),
                api.fetch_summary(&session),
                api.fetch_planning(&session),
            );

            Self::send_fetch_result(&tx, "Saldo", balance.map(group_by_kind), FetchResult::Balance)
                .await;
            Self::send_fetch_result(
                &tx,
                "Histórico",
                history.map(group_orders),
                FetchResult::History,
            )
            .await;
            Self::send_fetch_result(&tx, "Resumo", summary, FetchResult::Summary).await;
            Self::send_fetch_result(&tx, "Planejamento", planning, FetchResult::Planning).await;

            debug!("Background refresh complete");
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Refresh only the data behind the current view
    pub fn refresh_view_data(&mut self, view: View) {
        if view.movement_action().is_some() || view == View::Login {
            return;
        }
        self.spawn_fetch(view);
        self.status_message = Some(format!("Refreshing {}...", view.title()));
    }

    /// Spawn the fetch that backs a data view. Silent; results arrive through
    /// the channel.
    fn spawn_fetch(&self, view: View) {
        if !self.session.is_valid() {
            return;
        }

        let api = self.api.clone();
        let session = self.session.clone();
        let tx = self.fetch_tx.clone();

        match view {
            View::Home => {
                tokio::spawn(async move {
                    let res = api.fetch_summary(&session).await;
                    Self::send_fetch_result(&tx, "Resumo", res, FetchResult::Summary).await;
                });
            }
            View::Balance => {
                tokio::spawn(async move {
                    let res = api.fetch_balance(&session).await.map(group_by_kind);
                    Self::send_fetch_result(&tx, "Saldo", res, FetchResult::Balance).await;
                });
            }
            View::History => {
                tokio::spawn(async move {
                    let res = api.fetch_history(&session).await.map(group_orders);
                    Self::send_fetch_result(&tx, "Histórico", res, FetchResult::History).await;
                });
            }
            View::Planning => {
                tokio::spawn(async move {
                    let res = api.fetch_planning(&session).await;
                    Self::send_fetch_result(&tx, "Planejamento", res, FetchResult::Planning).await;
                });
            }
            View::Login | View::Entry | View::Exit => {}
        }
    }

    /// Helper to send a result back to the main loop
    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            warn!(error = %e, "Failed to send fetch result (receiver dropped)");
        }
    }

    /// Helper to send a successful fetch result or an error. An expired
    /// session gets its own variant so the UI can bounce to login.
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<FetchResult>,
        name: &str,
        result: Result<T, ApiError>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> FetchResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(ApiError::SessionExpired) => {
                warn!("{} request hit an expired session", name);
                Self::send_result(tx, FetchResult::SessionExpired).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                Self::send_result(tx, FetchResult::Error(format!("{}: {}", name, e))).await;
            }
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_fetch_result(result);
        }
    }

    /// Process a single result from a background task.
    ///
    /// Updates the corresponding app state. This is called by
    /// `check_background_tasks` for each result received from the channel.
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Balance(data) => {
                self.balance = Some(data);
                self.clear_progress_status();
            }
            FetchResult::History(data) => {
                if self.history_selection >= data.len() {
                    self.history_selection = data.len().saturating_sub(1);
                }
                // Indices may have shifted, collapse any open order
                self.history_expanded = None;
                self.history = Some(data);
                self.clear_progress_status();
            }
            FetchResult::Summary(data) => {
                self.summary = Some(data);
                self.clear_progress_status();
            }
            FetchResult::Planning(data) => {
                self.planning = Some(data);
                self.clear_progress_status();
            }
            FetchResult::MovementRegistered(action, receipt) => {
                info!(order = %receipt.order_id, "Movement batch registered");
                match action {
                    MovementAction::Entry => self.entry_cart.clear(),
                    MovementAction::Exit => self.exit_cart.clear(),
                }
                self.cart_selection = 0;
                self.form_error = None;

                // Per-item rejections come back inside the messages
                self.status_message = Some(if receipt.messages.is_empty() {
                    format!("Order {} registered", receipt.order_id)
                } else {
                    format!("Order {}: {}", receipt.order_id, receipt.messages.join("; "))
                });

                // Stock changed; pick up fresh balances and history
                self.spawn_fetch(View::Balance);
                self.spawn_fetch(View::History);
            }
            FetchResult::SessionExpired => {
                warn!("Session expired during a background request");
                self.force_login("Session expired. Please log in again.");
            }
            FetchResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                let lower = msg.to_lowercase();
                let user_message = if lower.contains("network") || lower.contains("connect") {
                    "Network error. Check your connection.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }

    /// Drop a "Refreshing..." status once data lands, but keep errors visible.
    fn clear_progress_status(&mut self) {
        if let Some(ref msg) = self.status_message {
            if msg.starts_with("Refreshing") {
                self.status_message = None;
            }
        }
    }

    // =========================================================================
    // Movement Cart
    // =========================================================================

    /// Kind currently highlighted in the movement form
    pub fn selected_kind(&self) -> GarmentKind {
        GarmentKind::ALL[self.kind_selection % GarmentKind::ALL.len()]
    }

    /// Size currently highlighted in the movement form
    pub fn selected_size(&self) -> Size {
        Size::ALL[self.size_selection % Size::ALL.len()]
    }

    /// The cart belonging to the current view, empty for non-movement views
    pub fn active_cart(&self) -> &[MovementItem] {
        match self.view.movement_action() {
            Some(MovementAction::Entry) => &self.entry_cart,
            Some(MovementAction::Exit) => &self.exit_cart,
            None => &[],
        }
    }

    fn cart_for_mut(&mut self, action: MovementAction) -> &mut Vec<MovementItem> {
        match action {
            MovementAction::Entry => &mut self.entry_cart,
            MovementAction::Exit => &mut self.exit_cart,
        }
    }

    /// Step the kind selector. Kinds without sizes pull focus off the size
    /// field so it cannot be left pointing at a hidden widget.
    pub fn cycle_kind(&mut self, forward: bool) {
        let n = GarmentKind::ALL.len();
        self.kind_selection = if forward {
            (self.kind_selection + 1) % n
        } else {
            (self.kind_selection + n - 1) % n
        };
        if !self.selected_kind().requires_size() && self.movement_focus == MovementFocus::Size {
            self.movement_focus = MovementFocus::Quantity;
        }
    }

    /// Step the size selector
    pub fn cycle_size(&mut self, forward: bool) {
        let n = Size::ALL.len();
        self.size_selection = if forward {
            (self.size_selection + 1) % n
        } else {
            (self.size_selection + n - 1) % n
        };
    }

    /// Move focus to the next movement form field, skipping the size field
    /// for kinds that do not carry one.
    pub fn focus_next_field(&mut self) {
        self.movement_focus = match self.movement_focus {
            MovementFocus::Kind => {
                if self.selected_kind().requires_size() {
                    MovementFocus::Size
                } else {
                    MovementFocus::Quantity
                }
            }
            MovementFocus::Size => MovementFocus::Quantity,
            MovementFocus::Quantity => MovementFocus::Add,
            MovementFocus::Add => MovementFocus::Cart,
            MovementFocus::Cart => MovementFocus::Kind,
        };
    }

    /// Move focus to the previous movement form field
    pub fn focus_prev_field(&mut self) {
        self.movement_focus = match self.movement_focus {
            MovementFocus::Kind => MovementFocus::Cart,
            MovementFocus::Size => MovementFocus::Kind,
            MovementFocus::Quantity => {
                if self.selected_kind().requires_size() {
                    MovementFocus::Size
                } else {
                    MovementFocus::Kind
                }
            }
            MovementFocus::Add => MovementFocus::Quantity,
            MovementFocus::Cart => MovementFocus::Add,
        };
    }

    /// Validate the form line and add it to the cart of the current view
    pub fn add_cart_item(&mut self) {
        let Some(action) = self.view.movement_action() else {
            return;
        };

        let kind = self.selected_kind();
        let size = if kind.requires_size() {
            Some(self.selected_size())
        } else {
            None
        };
        let quantity = parse_quantity(&self.quantity_input);

        let item = MovementItem {
            kind,
            size,
            quantity,
        };
        match item.validate() {
            Ok(()) => {
                self.form_error = None;
                self.status_message = Some(format!("Added {}", item.describe()));
                self.cart_for_mut(action).push(item);
            }
            Err(e) => {
                self.form_error = Some(e.to_string());
            }
        }
    }

    /// Remove the selected line from the cart of the current view
    pub fn remove_cart_item(&mut self) {
        let Some(action) = self.view.movement_action() else {
            return;
        };

        let selection = self.cart_selection;
        let cart = self.cart_for_mut(action);
        if cart.is_empty() {
            return;
        }

        let idx = selection.min(cart.len() - 1);
        let removed = cart.remove(idx);
        let remaining = cart.len();

        self.cart_selection = if remaining == 0 {
            0
        } else {
            idx.min(remaining - 1)
        };
        self.status_message = Some(format!("Removed {}", removed.describe()));
    }

    /// Validate the whole cart and submit it as one movement batch.
    /// Nothing leaves the client if any line is invalid.
    pub fn submit_cart(&mut self) {
        let Some(action) = self.view.movement_action() else {
            return;
        };

        let items = match action {
            MovementAction::Entry => self.entry_cart.clone(),
            MovementAction::Exit => self.exit_cart.clone(),
        };

        if let Err(e) = validate_batch(&items) {
            self.form_error = Some(e.to_string());
            return;
        }
        self.form_error = None;

        let api = self.api.clone();
        let session = self.session.clone();
        let tx = self.fetch_tx.clone();

        info!(
            count = items.len(),
            action = action.wire_name(),
            "Submitting movement batch"
        );
        tokio::spawn(async move {
            let res = api.submit_movements(&session, action, &items).await;
            Self::send_fetch_result(&tx, "Movimentação", res, move |r| {
                FetchResult::MovementRegistered(action, r)
            })
            .await;
        });

        self.status_message = Some("Submitting movements...".to_string());
    }

    /// Append a digit to the quantity field
    pub fn push_quantity_char(&mut self, c: char) {
        if c.is_ascii_digit() && self.quantity_input.len() < MAX_QUANTITY_DIGITS {
            self.quantity_input.push(c);
        }
    }

    /// Delete the last digit of the quantity field
    pub fn pop_quantity_char(&mut self) {
        self.quantity_input.pop();
    }

    // =========================================================================
    // History Selection
    // =========================================================================

    fn history_len(&self) -> usize {
        self.history.as_ref().map(|h| h.len()).unwrap_or(0)
    }

    /// Move the history selection down one order
    pub fn select_next_order(&mut self) {
        let len = self.history_len();
        if len > 0 && self.history_selection + 1 < len {
            self.history_selection += 1;
        }
    }

    /// Move the history selection up one order
    pub fn select_prev_order(&mut self) {
        self.history_selection = self.history_selection.saturating_sub(1);
    }

    /// Page the history selection down
    pub fn page_down_history(&mut self) {
        let len = self.history_len();
        if len > 0 {
            self.history_selection = (self.history_selection + PAGE_SCROLL_SIZE).min(len - 1);
        }
    }

    /// Page the history selection up
    pub fn page_up_history(&mut self) {
        self.history_selection = self.history_selection.saturating_sub(PAGE_SCROLL_SIZE);
    }

    /// Expand or collapse the selected order's item lines
    pub fn toggle_order_expanded(&mut self) {
        if self.history_len() == 0 {
            return;
        }
        self.history_expanded = match self.history_expanded {
            Some(idx) if idx == self.history_selection => None,
            _ => Some(self.history_selection),
        };
    }

    // =========================================================================
    // Exports
    // =========================================================================

    /// Write the slow-mover CSV next to the user's downloads
    pub fn export_planning_csv(&mut self) {
        let Some(ref data) = self.planning else {
            self.status_message = Some("Planning data not loaded yet".to_string());
            return;
        };

        match report::export_csv(data) {
            Ok(path) => {
                info!(path = %path.display(), "Stock CSV exported");
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "CSV export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Write the full planning report next to the user's downloads
    pub fn export_planning_report(&mut self) {
        let Some(ref data) = self.planning else {
            self.status_message = Some("Planning data not loaded yet".to_string());
            return;
        };

        match report::export_report(data) {
            Ok(path) => {
                info!(path = %path.display(), "Planning report exported");
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "Report export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Parse the quantity field. Anything unparseable counts as zero, which the
/// cart validation then rejects.
fn parse_quantity(input: &str) -> u32 {
    input.trim().parse().unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // View Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_view_next() {
        assert_eq!(View::Home.next(), View::Balance);
        assert_eq!(View::Balance.next(), View::Entry);
        assert_eq!(View::Entry.next(), View::Exit);
        assert_eq!(View::Exit.next(), View::History);
        assert_eq!(View::History.next(), View::Planning);
        assert_eq!(View::Planning.next(), View::Home); // Wraps around
        assert_eq!(View::Login.next(), View::Login); // Login does not cycle
    }

    #[test]
    fn test_view_prev() {
        assert_eq!(View::Home.prev(), View::Planning); // Wraps around
        assert_eq!(View::Planning.prev(), View::History);
        assert_eq!(View::History.prev(), View::Exit);
        assert_eq!(View::Exit.prev(), View::Entry);
        assert_eq!(View::Entry.prev(), View::Balance);
        assert_eq!(View::Balance.prev(), View::Home);
        assert_eq!(View::Login.prev(), View::Login);
    }

    #[test]
    fn test_main_views_match_navbar_order() {
        assert_eq!(MAIN_VIEWS.len(), 6);
        assert_eq!(MAIN_VIEWS[0], View::Home);
        assert_eq!(MAIN_VIEWS[5], View::Planning);
        // Every main view reaches the next via the cycle
        for pair in MAIN_VIEWS.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
    }

    #[test]
    fn test_movement_action_per_view() {
        assert_eq!(View::Entry.movement_action(), Some(MovementAction::Entry));
        assert_eq!(View::Exit.movement_action(), Some(MovementAction::Exit));
        assert_eq!(View::Home.movement_action(), None);
        assert_eq!(View::History.movement_action(), None);
        assert_eq!(View::Login.movement_action(), None);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        // Valid chars within length
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        // Exceeds max length
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(100, 'a'));
        // Control characters rejected
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
        assert!(!can_add_username_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("42"), 42);
        assert_eq!(parse_quantity("007"), 7);
        assert_eq!(parse_quantity(" 3 "), 3);
        // Unparseable input falls back to zero; the cart rejects it later
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("-3"), 0);
    }
}
