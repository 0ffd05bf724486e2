use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::token::{is_token_valid, token_expiry};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// What login grants and refresh renews. Field names double as the on-disk
/// JSON keys; `access_token` is the canonical one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    /// Absolute epoch seconds. The auth endpoint calls this `expires_in`
    /// but sends an absolute timestamp.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Where the route gate sends the caller. The view layer interprets this;
/// the gate itself never renders anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Proceed,
    RedirectToLogin,
    RedirectToHome,
}

/// Shared session context. Clones hand background tasks the same token
/// cell; only the session client writes to it (login, refresh, clear).
#[derive(Clone)]
pub struct Session {
    data_dir: PathBuf,
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Load whatever session the disk holds. Expiry is not checked here;
    /// the route gate decides what a stale token means.
    pub fn load(&self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        *self.write_guard() = Some(data);
        Ok(true)
    }

    pub fn token(&self) -> Option<String> {
        self.read_guard().as_ref().map(|d| d.access_token.clone())
    }

    pub fn username(&self) -> Option<String> {
        self.read_guard().as_ref().and_then(|d| d.username.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.read_guard().as_ref().and_then(|d| d.role.clone())
    }

    /// Valid means present and carrying a still-future `exp` claim.
    pub fn is_valid(&self) -> bool {
        match self.token() {
            Some(token) => is_token_valid(&token),
            None => false,
        }
    }

    /// Minutes left on the token, for the status line. Reads the token's own
    /// `exp`, falling back to the stored expiry marker.
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        let guard = self.read_guard();
        let data = guard.as_ref()?;
        let exp = token_expiry(&data.access_token).or(data.expires_at)?;
        Some(((exp - chrono::Utc::now().timestamp()) / 60).max(0))
    }

    /// Install a fresh login grant and persist it.
    pub fn establish(&self, data: SessionData) {
        *self.write_guard() = Some(data);
        self.persist();
    }

    /// Swap in a refreshed token, keeping who is logged in.
    pub fn apply_grant(&self, access_token: String, expires_at: Option<i64>) {
        {
            let mut guard = self.write_guard();
            match guard.as_mut() {
                Some(data) => {
                    data.access_token = access_token;
                    data.expires_at = expires_at;
                }
                None => {
                    *guard = Some(SessionData {
                        access_token,
                        expires_at,
                        username: None,
                        role: None,
                    });
                }
            }
        }
        self.persist();
    }

    /// Wholesale clear: memory and disk. Used by logout, the route gate and
    /// the expired-session path, none of which can do anything useful with
    /// an fs error, so failures are only logged.
    pub fn clear(&self) {
        *self.write_guard() = None;
        let path = self.session_path();
        if path.exists() {
            if let Err(error) = std::fs::remove_file(&path) {
                warn!(%error, "failed to remove session file");
            }
        }
    }

    /// Route gate: decides whether the caller may stay where it is.
    /// An invalid token also clears whatever was stored.
    pub fn authorize_route(&self, at_root: bool) -> NavCommand {
        if !self.is_valid() {
            self.clear();
            return NavCommand::RedirectToLogin;
        }
        if at_root {
            return NavCommand::RedirectToHome;
        }
        NavCommand::Proceed
    }

    fn persist(&self) {
        let snapshot = self.read_guard().clone();
        let Some(data) = snapshot else { return };
        let path = self.session_path();
        let result = (|| -> Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(&data)?;
            std::fs::write(&path, contents)?;
            Ok(())
        })();
        if let Err(error) = result {
            warn!(%error, "failed to persist session file");
        }
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Option<SessionData>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Option<SessionData>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn make_token(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", exp));
        format!("{}.{}.sig", header, payload)
    }

    fn future_token() -> String {
        make_token(chrono::Utc::now().timestamp() + 3600)
    }

    fn session_with(dir: &std::path::Path, token: String) -> Session {
        let session = Session::new(dir.to_path_buf());
        session.establish(SessionData {
            access_token: token,
            expires_at: None,
            username: Some("ana".to_string()),
            role: Some("admin".to_string()),
        });
        session
    }

    #[test]
    fn test_establish_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let token = future_token();
        session_with(dir.path(), token.clone());

        let reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.token(), Some(token));
        assert_eq!(reloaded.username(), Some("ana".to_string()));
        assert!(reloaded.is_valid());
    }

    #[test]
    fn test_clear_removes_file_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(dir.path(), future_token());
        session.clear();

        assert_eq!(session.token(), None);
        assert!(!dir.path().join("session.json").exists());
        let reloaded = Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().unwrap());
    }

    #[test]
    fn test_apply_grant_keeps_identity() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(dir.path(), future_token());
        let renewed = future_token();
        session.apply_grant(renewed.clone(), Some(123));

        assert_eq!(session.token(), Some(renewed));
        assert_eq!(session.username(), Some("ana".to_string()));
    }

    #[test]
    fn test_gate_without_session_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        assert_eq!(session.authorize_route(false), NavCommand::RedirectToLogin);
    }

    #[test]
    fn test_gate_with_expired_token_clears_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(dir.path(), make_token(0));
        assert_eq!(session.authorize_route(false), NavCommand::RedirectToLogin);
        // the stale session is gone from disk too
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_gate_at_root_redirects_home_once() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(dir.path(), future_token());
        assert_eq!(session.authorize_route(true), NavCommand::RedirectToHome);
        // the landing route itself proceeds, so there is no redirect loop
        assert_eq!(session.authorize_route(false), NavCommand::Proceed);
    }

    #[test]
    fn test_clones_share_the_token_cell() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        let clone = session.clone();
        clone.apply_grant(future_token(), None);
        assert_eq!(session.token(), clone.token());
    }
}
