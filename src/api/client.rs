//! API client for the SICRO inventory backend.
//!
//! This module provides the `ApiClient` struct for authenticated requests,
//! plus the 401 retry policy every authenticated call runs under.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::models::{
    BalanceEntry, MonthlySummary, MovementAction, MovementItem, MovementReceipt, MovementRecord,
    MovementRequest, PlanningData,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Every backend route is mounted under this prefix.
const API_PREFIX: &str = "/api";

// ============================================================================
// Wire shapes
// ============================================================================

/// Response of POST /api/token and POST /api/refresh. `expires_in` carries
/// an absolute epoch timestamp despite its name; the refresh variant omits
/// `role`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// 401 retry policy
// ============================================================================

/// Outcome of a single authenticated attempt. `AuthExpired` is the one
/// rejection the retry policy may act on; everything else is a plain error.
#[derive(Debug)]
pub(crate) enum Attempt<T> {
    Ok(T),
    AuthExpired,
}

/// The 401 policy, in one place: a rejected attempt triggers exactly one
/// refresh; a renewed token is persisted through the session context and
/// gets exactly one re-issue of the original request. A refresh failure or
/// a second rejection clears the session and surfaces `SessionExpired`.
pub(crate) async fn with_refresh<T, A, FutA, R, FutR>(
    session: &Session,
    mut attempt: A,
    refresh: R,
) -> Result<T, ApiError>
where
    A: FnMut(Option<String>) -> FutA,
    FutA: Future<Output = Result<Attempt<T>, ApiError>>,
    R: FnOnce() -> FutR,
    FutR: Future<Output = Result<TokenGrant, ApiError>>,
{
    match attempt(session.token()).await? {
        Attempt::Ok(value) => Ok(value),
        Attempt::AuthExpired => {
            debug!("request rejected with 401, attempting token refresh");
            let grant = match refresh().await {
                Ok(grant) => grant,
                Err(error) => {
                    warn!(%error, "token refresh failed, ending session");
                    session.clear();
                    return Err(ApiError::SessionExpired);
                }
            };
            info!("access token refreshed");
            session.apply_grant(grant.access_token.clone(), grant.expires_in);
            match attempt(Some(grant.access_token)).await? {
                Attempt::Ok(value) => Ok(value),
                // The renewed token was rejected too. Never refresh twice
                // for one request.
                Attempt::AuthExpired => {
                    session.clear();
                    Err(ApiError::SessionExpired)
                }
            }
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the SICRO backend.
///
/// Clone is cheap - reqwest::Client is Arc-backed, and clones share the
/// cookie store carrying the HTTP-only refresh credential. Access tokens
/// are not stored here; each request reads one from the `Session` context
/// it is given.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Check response status and convert errors to ApiError
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    /// Exchange credentials for a token grant. The response also plants the
    /// refresh cookie in this client's cookie store.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, ApiError> {
        debug!("authenticating as {}", username);
        let response = self
            .client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        let grant = response.json::<TokenGrant>().await?;
        Ok(grant)
    }

    /// Renew the access token. The credential is the HTTP-only cookie
    /// captured at login; no bearer token goes out here.
    pub async fn refresh(&self) -> Result<TokenGrant, ApiError> {
        let response = self.client.post(self.url("/refresh")).send().await?;
        let response = Self::check_response(response).await?;
        let grant = response.json::<TokenGrant>().await?;
        Ok(grant)
    }

    /// Server-side logout, which clears the refresh cookie. Best effort:
    /// callers clear local state whatever this returns.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.url("/logout")).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// One authenticated attempt. A 401 becomes `Attempt::AuthExpired` so
    /// the retry policy can see it; other failures are final.
    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> Result<Attempt<T>, ApiError> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(Attempt::AuthExpired);
        }
        let response = Self::check_response(response).await?;
        let data = response.json::<T>().await?;
        Ok(Attempt::Ok(data))
    }

    /// Issue an authenticated request under the 401 policy.
    async fn request_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let attempt = |token: Option<String>| {
            let method = method.clone();
            let body = body.clone();
            async move {
                self.send_once(method, path, body.as_ref(), token.as_deref())
                    .await
            }
        };
        with_refresh(session, attempt, || self.refresh()).await
    }

    /// GET /api/saldo - current stock, pre-sorted by the server.
    pub async fn fetch_balance(&self, session: &Session) -> Result<Vec<BalanceEntry>, ApiError> {
        self.request_json(session, Method::GET, "/saldo", None)
            .await
    }

    /// GET /api/historico - newest 200 movement rows.
    pub async fn fetch_history(&self, session: &Session) -> Result<Vec<MovementRecord>, ApiError> {
        self.request_json(session, Method::GET, "/historico", None)
            .await
    }

    /// GET /api/dashboard/resumo - month-to-date totals and ranking.
    pub async fn fetch_summary(&self, session: &Session) -> Result<MonthlySummary, ApiError> {
        self.request_json(session, Method::GET, "/dashboard/resumo", None)
            .await
    }

    /// GET /api/dashboard/planejamento - consumption series and slow movers.
    pub async fn fetch_planning(&self, session: &Session) -> Result<PlanningData, ApiError> {
        self.request_json(session, Method::GET, "/dashboard/planejamento", None)
            .await
    }

    /// POST /api/movimentar - submit a whole cart under one action.
    /// Per-item problems come back inside the receipt's messages; only
    /// auth/permission failures surface as errors.
    pub async fn submit_movements(
        &self,
        session: &Session,
        action: MovementAction,
        items: &[MovementItem],
    ) -> Result<MovementReceipt, ApiError> {
        let request = MovementRequest::new(action, items);
        let body = serde_json::to_value(&request)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to encode request: {}", e)))?;
        debug!(
            items = items.len(),
            action = action.wire_name(),
            "submitting movement batch"
        );
        self.request_json(session, Method::POST, "/movimentar", Some(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionData;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use std::cell::{Cell, RefCell};

    fn make_token(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", exp));
        format!("h.{}.s", payload)
    }

    fn seeded_session(dir: &std::path::Path) -> Session {
        let session = Session::new(dir.to_path_buf());
        session.establish(SessionData {
            access_token: make_token(chrono::Utc::now().timestamp() + 3600),
            expires_at: None,
            username: Some("ana".to_string()),
            role: Some("admin".to_string()),
        });
        session
    }

    fn grant(token: &str) -> TokenGrant {
        TokenGrant {
            access_token: token.to_string(),
            expires_in: Some(chrono::Utc::now().timestamp() + 3600),
            role: None,
        }
    }

    #[test]
    fn test_parse_token_grant() {
        let json = r#"{
            "access_token": "abc.def.ghi",
            "expires_in": 1736275530,
            "token_type": "bearer",
            "role": "admin"
        }"#;
        let grant: TokenGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.access_token, "abc.def.ghi");
        assert_eq!(grant.expires_in, Some(1736275530));
        assert_eq!(grant.role, Some("admin".to_string()));
    }

    #[test]
    fn test_url_joins_prefix() {
        let api = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(api.url("/saldo"), "http://localhost:8000/api/saldo");
    }

    #[tokio::test]
    async fn test_first_attempt_success_never_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_session(dir.path());
        let refreshes = Cell::new(0);

        let result: Result<i32, ApiError> = with_refresh(
            &session,
            |_token| async { Ok(Attempt::Ok(7)) },
            || {
                refreshes.set(refreshes.get() + 1);
                async { Ok(grant("unused")) }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(refreshes.get(), 0);
    }

    #[tokio::test]
    async fn test_rejected_attempt_is_retried_once_with_new_token() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_session(dir.path());
        let attempts = Cell::new(0);
        let seen = RefCell::new(Vec::new());
        let renewed = make_token(chrono::Utc::now().timestamp() + 7200);

        let result: Result<i32, ApiError> = with_refresh(
            &session,
            |token| {
                attempts.set(attempts.get() + 1);
                seen.borrow_mut().push(token);
                let first = attempts.get() == 1;
                async move {
                    if first {
                        Ok(Attempt::AuthExpired)
                    } else {
                        Ok(Attempt::Ok(42))
                    }
                }
            },
            || async { Ok(grant(&renewed)) },
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.get(), 2);
        // the re-issued request used the renewed token
        assert_eq!(seen.borrow()[1], Some(renewed.clone()));
        // and the session context persisted it
        assert_eq!(session.token(), Some(renewed));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_session(dir.path());
        let attempts = Cell::new(0);

        let result: Result<i32, ApiError> = with_refresh(
            &session,
            |_token| {
                attempts.set(attempts.get() + 1);
                async { Ok(Attempt::AuthExpired) }
            },
            || async { Err(ApiError::Unauthorized) },
        )
        .await;

        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert_eq!(attempts.get(), 1);
        assert_eq!(session.token(), None);
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_second_rejection_is_terminal_without_second_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_session(dir.path());
        let attempts = Cell::new(0);
        let refreshes = Cell::new(0);

        let result: Result<i32, ApiError> = with_refresh(
            &session,
            |_token| {
                attempts.set(attempts.get() + 1);
                async { Ok(Attempt::AuthExpired) }
            },
            || {
                refreshes.set(refreshes.get() + 1);
                async { Ok(grant("still-rejected")) }
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert_eq!(attempts.get(), 2);
        assert_eq!(refreshes.get(), 1);
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn test_non_auth_error_passes_through_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let session = seeded_session(dir.path());
        let refreshes = Cell::new(0);

        let result: Result<i32, ApiError> = with_refresh(
            &session,
            |_token| async { Err(ApiError::AccessDenied("admins only".to_string())) },
            || {
                refreshes.set(refreshes.get() + 1);
                async { Ok(grant("unused")) }
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::AccessDenied(_))));
        assert_eq!(refreshes.get(), 0);
        // a 403 must not disturb the session
        assert!(session.token().is_some());
    }
}
