//! Low-level HTTP client — `BlogHttp`.
//!
//! One generic entry point, [`BlogHttp::send`], turns (method, path, body,
//! expected type) into a single HTTP exchange. Successful bodies are decoded
//! into the expected type; failures come back as an [`ApiError`] from the
//! classifier. Sub-clients in `domain/*/client.rs` and `auth/client.rs` wrap
//! this with typed methods.

use std::sync::Arc;

use async_lock::RwLock;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::session::Session;
use crate::error::{ApiError, SdkError, TransportFailure};
use crate::http::classify::{classify_response, is_blank, FailedResponse, ResponseBody};
use crate::network::API_ROOT;

/// Low-level HTTP client for the blog REST API.
#[derive(Clone)]
pub struct BlogHttp {
    api_base: String,
    client: Client,
    /// Shared with the auth sub-client. Read on every request for the bearer.
    session: Arc<RwLock<Session>>,
}

impl BlogHttp {
    pub(crate) fn new(host: &str, client: Client, session: Session) -> Self {
        Self {
            api_base: format!("{}/{}", host.trim_end_matches('/'), API_ROOT),
            client,
            session: Arc::new(RwLock::new(session)),
        }
    }

    /// `<host>/api`, no trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    pub(crate) fn session(&self) -> &Arc<RwLock<Session>> {
        &self.session
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    /// Perform one exchange and decode the response as `T`.
    ///
    /// - 2xx: the body (empty or blank reads as `null`) must deserialize into `T`;
    ///   if it does not, the result is [`SdkError::Schema`].
    /// - non-2xx: the body is classified into an [`ApiError`].
    /// - no response: [`ApiError::Transport`].
    ///
    /// No retries. The bearer token is whatever the session holds when the
    /// request is built.
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.read().await.token() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        #[cfg(target_arch = "wasm32")]
        {
            req = req.fetch_credentials_omit();
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        tracing::debug!(
            method = %method,
            status = status.as_u16(),
            "request to {}",
            url
        );

        if status.is_success() {
            let value: Value = if is_blank(&bytes) {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::from(TransportFailure::decode(&e)))?
            };
            return serde_json::from_value(value).map_err(|source| SdkError::Schema {
                path: path.to_string(),
                source,
            });
        }

        let failed = FailedResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            ResponseBody::decode(&bytes),
        );
        Err(classify_response(&failed).into())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// `POST` with no request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.send(Method::POST, path, None::<&()>).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SdkError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        self.send(Method::DELETE, path, None::<&()>).await
    }
}

impl std::fmt::Debug for BlogHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogHttp")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
