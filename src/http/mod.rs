//! HTTP client layer — `BlogHttp` dispatcher and failure classification.

pub mod classify;
pub mod client;

pub use classify::{classify_response, FailedResponse, ResponseBody};
pub use client::BlogHttp;
