//! Session and credential handling.
//!
//! This module provides:
//! - `token`: bearer-token payload inspection (`exp`-based validity)
//! - `Session`: the shared session context, persisted to disk and cleared
//!   wholesale on logout or expiry, plus the route gate
//! - `CredentialStore`: optional OS-level password storage via keyring
//!
//! Validity always comes from the token's own `exp` claim, never from a
//! locally computed age.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{NavCommand, Session, SessionData};
pub use token::{is_token_valid, token_expiry};
