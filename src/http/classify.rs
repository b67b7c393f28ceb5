//! Failure classification — maps a failed exchange onto one [`ApiError`].
//!
//! Order matters and the first match wins:
//!
//! 1. no response at all (connect, timeout, body read, ...) → `Transport`
//! 2. body fits the validation shape → `Validation`
//! 3. body fits the problem-details shape → `Generic`
//! 4. anything else → `Generic` synthesized from the status line and body
//!
//! Step 2 runs before step 3 because a validation body is also a valid
//! problem-details body; trying `Generic` first would drop the per-field map.

use std::collections::BTreeMap;
use std::error::Error as _;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ProblemDetails, SdkError, TransportFailure, ValidationErrors};

/// `type` of a problem synthesized from the status line.
pub const GENERIC_PROBLEM_TYPE: &str = "Generic API Error";

/// Body of a failed response, decoded as far as possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// JSON if it parses, raw text otherwise.
    pub fn decode(bytes: &[u8]) -> Self {
        if is_blank(bytes) {
            return ResponseBody::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Deterministic string form used as a problem `detail`.
    ///
    /// Structured JSON is re-serialized compactly, strings and raw text are
    /// returned verbatim, and a missing body renders as `"null"`.
    pub fn render(&self) -> String {
        match self {
            ResponseBody::Empty => "null".to_string(),
            ResponseBody::Json(Value::String(s)) => s.clone(),
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }

    fn json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// No body, or nothing but whitespace.
pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// A response that came back with a non-success status.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedResponse {
    pub status: u16,
    pub status_text: String,
    pub body: ResponseBody,
}

impl FailedResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }
}

/// A shape test. `None` means "not this shape", never an error.
type Probe = fn(&FailedResponse) -> Option<ApiError>;

const PROBES: [Probe; 2] = [probe_validation, probe_problem_details];

/// Map a non-success response to exactly one taxonomy value.
pub fn classify_response(response: &FailedResponse) -> ApiError {
    let error = PROBES
        .iter()
        .find_map(|probe| probe(response))
        .unwrap_or_else(|| from_status_line(response));
    tracing::debug!(
        status = response.status,
        kind = %error.kind(),
        "classified failed response"
    );
    error
}

// ─── Probes ──────────────────────────────────────────────────────────────────

/// Validation body. Only `errors` is required; the metadata falls back to the
/// status line when the server leaves it out.
#[derive(Deserialize)]
struct ValidationWire {
    #[serde(rename = "type")]
    problem_type: Option<String>,
    title: Option<String>,
    status: Option<u16>,
    errors: BTreeMap<String, Vec<String>>,
    #[serde(rename = "traceId")]
    trace_id: Option<String>,
}

#[derive(Deserialize)]
struct ProblemWire {
    #[serde(rename = "type")]
    problem_type: String,
    title: String,
    status: u16,
    #[serde(default)]
    detail: Option<String>,
}

fn probe_validation(response: &FailedResponse) -> Option<ApiError> {
    let wire = ValidationWire::deserialize(response.body.json()?).ok()?;
    Some(ApiError::Validation(ValidationErrors {
        problem_type: wire.problem_type.unwrap_or_else(|| "about:blank".to_string()),
        title: wire.title.unwrap_or_else(|| response.status_text.clone()),
        status: wire.status.unwrap_or(response.status),
        errors: wire.errors,
        trace_id: wire.trace_id.unwrap_or_default(),
    }))
}

fn probe_problem_details(response: &FailedResponse) -> Option<ApiError> {
    let wire = ProblemWire::deserialize(response.body.json()?).ok()?;
    Some(ApiError::Generic(ProblemDetails {
        problem_type: wire.problem_type,
        title: wire.title,
        status: wire.status,
        detail: wire.detail,
    }))
}

fn from_status_line(response: &FailedResponse) -> ApiError {
    ApiError::Generic(ProblemDetails {
        problem_type: GENERIC_PROBLEM_TYPE.to_string(),
        title: response.status_text.clone(),
        status: response.status,
        detail: Some(response.body.render()),
    })
}

// ─── Transport ───────────────────────────────────────────────────────────────

/// Describe a transport-level failure: message chain as `type`, category as
/// `title`.
pub fn transport_failure(error: &reqwest::Error) -> TransportFailure {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    TransportFailure::new(message, transport_category(error))
}

fn transport_category(error: &reqwest::Error) -> &'static str {
    if error.is_builder() {
        return "BuilderError";
    }
    if error.is_timeout() {
        return "TimeoutError";
    }
    #[cfg(not(target_arch = "wasm32"))]
    if error.is_connect() {
        return "ConnectError";
    }
    if error.is_redirect() {
        return "RedirectError";
    }
    if error.is_body() {
        return "BodyError";
    }
    if error.is_decode() {
        return "DecodeError";
    }
    if error.is_request() {
        return "RequestError";
    }
    "TransportError"
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(transport_failure(&error))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(error: reqwest::Error) -> Self {
        SdkError::Api(error.into())
    }
}
