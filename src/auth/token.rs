//! JWT claim extraction.
//!
//! Tokens are decoded without signature verification: the client only needs
//! the subject and expiry to keep its cached identity consistent. The server
//! remains the authority on validity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::user::User;
use crate::error::AuthError;
use crate::shared::UserId;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is not a three-part JWT")]
    Malformed,

    #[error("Token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Token has no subject claim")]
    MissingSubject,

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(String),
}

/// Claims the backend puts in its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub username: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/userdata")]
    user_data: Option<String>,
    unique_name: Option<String>,
    exp: Option<i64>,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(TokenError::Malformed),
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let raw: RawClaims = serde_json::from_slice(&bytes)?;

        let user_data = raw.user_data.ok_or(TokenError::MissingSubject)?;
        // The userdata claim holds the id JSON-encoded, quotes included.
        let user_id = serde_json::from_str::<UserId>(&user_data)
            .or_else(|_| user_data.parse::<UserId>())
            .map_err(|_| TokenError::InvalidSubject(user_data.clone()))?;

        Ok(Self {
            user_id,
            username: raw.unique_name,
            expires_at: raw.exp.and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

/// Reject a `(token, user)` pair whose ids disagree.
///
/// Opaque tokens carry no claim to check against and always pass.
pub(crate) fn ensure_subject(token: &str, user: &User) -> Result<(), AuthError> {
    match TokenClaims::decode(token) {
        Ok(claims) if claims.user_id != user.id => Err(AuthError::SubjectMismatch {
            token_subject: claims.user_id,
            user_id: user.id,
        }),
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::trace!("token claims unavailable: {}", e);
            Ok(())
        }
    }
}

/// Whether `user` may stay cached next to `token`.
pub(crate) fn user_matches(token: &str, user: &User) -> bool {
    TokenClaims::decode(token)
        .map(|claims| claims.user_id == user.id)
        .unwrap_or(false)
}
