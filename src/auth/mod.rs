//! Authentication — bearer token lifecycle, session state, login/logout.
//!
//! ## Session Model
//!
//! - The session holds the current bearer token and a cached snapshot of the
//!   logged-in [`User`]. The dispatcher reads the token on every request and
//!   sends `Authorization: Bearer <token>`; with no token the header is omitted.
//! - The session is only mutated by the transitions on the `Auth` sub-client
//!   (`login`, `register`, `authenticate`, `authenticate_unchecked`,
//!   `refresh_token`, `logout`).
//! - Every committed mutation fires the `on_token_changed` hook exactly once,
//!   with the new state. Logging out fires it with `(None, None)`.
//!
//! ## Persisting a session
//!
//! Store the token from the hook, then seed a new client with
//! `BlogClient::builder().token(saved)` (or call `auth().authenticate(saved)` to
//! have the server validate it first).

#[cfg(feature = "http")]
pub mod client;

pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::domain::user::User;

pub use session::TokenChangedHook;
pub use token::{TokenClaims, TokenError};

// ============================================================================
// Wire types
// ============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

/// Body of `POST /auth/change-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub password: &'a str,
}

/// Response of login, register and refresh: a fresh token plus the profile
/// it was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}
