//! REST API client module for the SICRO backend.
//!
//! This module provides the `ApiClient` for fetching stock, history and
//! dashboard data and for submitting movement batches.
//!
//! The API uses JWT bearer authentication; the access token comes from
//! POST /api/token and is renewed through the cookie-based refresh
//! endpoint under the single-retry policy in `client::with_refresh`.

pub mod client;
pub mod error;

pub use client::{ApiClient, TokenGrant};
pub use error::ApiError;
