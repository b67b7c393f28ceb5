//! Unified SDK error types.
//!
//! Every failed exchange with the backend is mapped into exactly one
//! [`ApiError`] kind. Callers inspect it with [`ApiError::kind`] or narrow it
//! with [`ApiError::downcast`], which never panics:
//!
//! ```rust,ignore
//! match client.posts().create(&post).await {
//!     Ok(post) => println!("created {}", post.id),
//!     Err(e) => {
//!         if let Some(v) = e.downcast::<ValidationErrors>() {
//!             for (field, messages) in &v.errors {
//!                 println!("{field}: {}", messages.join(", "));
//!             }
//!         }
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::UserId;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The backend (or the transport) reported a failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A successful response did not match the type the caller asked for.
    #[error("Response from `{path}` did not match the expected shape: {source}")]
    Schema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A rendered [`ApiError`] could not be parsed back.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The client could not be built from the given settings.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SdkError {
    /// The taxonomy value, if this error came from an exchange.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            SdkError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ApiErrorKind> {
        self.api().map(ApiError::kind)
    }

    /// Narrow to a specific taxonomy payload. `None` for non-API errors.
    pub fn downcast<P: ErrorPayload>(&self) -> Option<&P> {
        self.api().and_then(ApiError::downcast)
    }
}

/// Local authentication failures (no server round-trip involved).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token subject {token_subject} does not match user {user_id}")]
    SubjectMismatch {
        token_subject: UserId,
        user_id: UserId,
    },
}

// ─── Taxonomy ────────────────────────────────────────────────────────────────

/// Discriminant of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    Validation,
    Generic,
    Transport,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Generic => "generic",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field-level validation failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    /// Field name → violation messages, in server order.
    pub errors: BTreeMap<String, Vec<String>>,
    #[serde(rename = "traceId")]
    pub trace_id: String,
}

/// Problem-details body not tied to a specific field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The exchange never produced a server-classified outcome.
///
/// `problem_type` carries the underlying failure message and `title` its
/// category (`ConnectError`, `DecodeError`, ...). There is no status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportFailure {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
}

impl TransportFailure {
    pub fn new(problem_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            problem_type: problem_type.into(),
            title: title.into(),
        }
    }

    /// A body that was expected to be JSON could not be decoded.
    pub fn decode(error: &serde_json::Error) -> Self {
        Self::new(error.to_string(), "DecodeError")
    }
}

/// Closed error taxonomy for API exchanges.
///
/// Renders (via `Display`) as a pretty JSON document tagged with `kind`;
/// [`FromStr`] parses that document back without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ApiError {
    Validation(ValidationErrors),
    Generic(ProblemDetails),
    Transport(TransportFailure),
}

impl ApiError {
    /// Build a taxonomy value; the payload type selects the kind.
    pub fn classify<P: ErrorPayload>(payload: P) -> Self {
        payload.into_error()
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Validation(_) => ApiErrorKind::Validation,
            ApiError::Generic(_) => ApiErrorKind::Generic,
            ApiError::Transport(_) => ApiErrorKind::Transport,
        }
    }

    /// Return the payload iff the active kind is `P::KIND`.
    pub fn downcast<P: ErrorPayload>(&self) -> Option<&P> {
        P::from_error(self)
    }

    pub fn as_validation(&self) -> Option<&ValidationErrors> {
        self.downcast()
    }

    pub fn as_generic(&self) -> Option<&ProblemDetails> {
        self.downcast()
    }

    pub fn as_transport(&self) -> Option<&TransportFailure> {
        self.downcast()
    }

    /// HTTP status, absent for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(v) => Some(v.status),
            ApiError::Generic(g) => Some(g.status),
            ApiError::Transport(_) => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ApiError::Validation(v) => &v.title,
            ApiError::Generic(g) => &g.title,
            ApiError::Transport(t) => &t.title,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl std::error::Error for ApiError {}

impl FromStr for ApiError {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Narrow an arbitrary error to a taxonomy payload.
///
/// Accepts a bare [`ApiError`] or an [`SdkError::Api`]; anything else
/// (including other error types entirely) yields `None`.
pub fn try_downcast<'a, P: ErrorPayload>(
    error: &'a (dyn std::error::Error + 'static),
) -> Option<&'a P> {
    if let Some(api) = error.downcast_ref::<ApiError>() {
        return api.downcast();
    }
    match error.downcast_ref::<SdkError>() {
        Some(sdk) => sdk.downcast(),
        None => None,
    }
}

// ─── Payload typing ──────────────────────────────────────────────────────────

/// A payload type bound to exactly one [`ApiErrorKind`].
pub trait ErrorPayload: Sized {
    const KIND: ApiErrorKind;

    fn from_error(error: &ApiError) -> Option<&Self>;

    fn into_error(self) -> ApiError;
}

impl ErrorPayload for ValidationErrors {
    const KIND: ApiErrorKind = ApiErrorKind::Validation;

    fn from_error(error: &ApiError) -> Option<&Self> {
        match error {
            ApiError::Validation(v) => Some(v),
            _ => None,
        }
    }

    fn into_error(self) -> ApiError {
        ApiError::Validation(self)
    }
}

impl ErrorPayload for ProblemDetails {
    const KIND: ApiErrorKind = ApiErrorKind::Generic;

    fn from_error(error: &ApiError) -> Option<&Self> {
        match error {
            ApiError::Generic(g) => Some(g),
            _ => None,
        }
    }

    fn into_error(self) -> ApiError {
        ApiError::Generic(self)
    }
}

impl ErrorPayload for TransportFailure {
    const KIND: ApiErrorKind = ApiErrorKind::Transport;

    fn from_error(error: &ApiError) -> Option<&Self> {
        match error {
            ApiError::Transport(t) => Some(t),
            _ => None,
        }
    }

    fn into_error(self) -> ApiError {
        ApiError::Transport(self)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(payload: ValidationErrors) -> Self {
        payload.into_error()
    }
}

impl From<ProblemDetails> for ApiError {
    fn from(payload: ProblemDetails) -> Self {
        payload.into_error()
    }
}

impl From<TransportFailure> for ApiError {
    fn from(payload: TransportFailure) -> Self {
        payload.into_error()
    }
}
