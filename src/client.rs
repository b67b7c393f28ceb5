//! High-level client — `BlogClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`; auth lives
//! in `auth/client.rs`. This module keeps the builder and the accessors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};

use crate::auth::client::Auth;
use crate::auth::session::{Session, TokenChangedHook};
use crate::auth::token;
use crate::domain::mute::client::Mutes;
use crate::domain::post::client::Posts;
use crate::domain::user::client::Users;
use crate::domain::user::User;
use crate::error::SdkError;
use crate::http::BlogHttp;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::mute::client::Mutes as MutesClient;
pub use crate::domain::post::client::Posts as PostsClient;
pub use crate::domain::user::client::Users as UsersClient;

/// The primary entry point for the blog API.
///
/// Provides nested sub-client accessors for each domain:
/// `client.auth()`, `client.posts()`, etc. Clones share one session.
#[derive(Debug, Clone)]
pub struct BlogClient {
    pub(crate) http: BlogHttp,
}

impl BlogClient {
    pub fn builder() -> BlogClientBuilder {
        BlogClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts { client: self }
    }

    pub fn mutes(&self) -> Mutes<'_> {
        Mutes { client: self }
    }

    /// The underlying dispatcher, for endpoints without a typed wrapper.
    pub fn http(&self) -> &BlogHttp {
        &self.http
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct BlogClientBuilder {
    host: String,
    token: Option<String>,
    current_user: Option<User>,
    on_token_changed: Option<TokenChangedHook>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl Default for BlogClientBuilder {
    fn default() -> Self {
        Self {
            host: crate::network::DEFAULT_HOST.to_string(),
            token: None,
            current_user: None,
            on_token_changed: None,
            timeout: None,
            headers: Vec::new(),
        }
    }
}

impl BlogClientBuilder {
    /// Scheme and authority of the backend, e.g. `https://blog.example.com`.
    /// The `/api` prefix is added by the client.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Seed a persisted token. It is not validated; call
    /// `auth().authenticate(..)` for that.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Seed the cached profile that goes with [`token`](Self::token).
    pub fn current_user(mut self, user: User) -> Self {
        self.current_user = Some(user);
        self
    }

    pub fn on_token_changed<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&str>, Option<&User>) + Send + Sync + 'static,
    {
        self.on_token_changed = Some(std::sync::Arc::new(hook));
        self
    }

    /// Per-request timeout. No timeout unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Extra header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Result<BlogClient, SdkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SdkError::Config(format!("header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| SdkError::Config(format!("header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SdkError::Config(e.to_string()))?;

        let current_user = match (&self.token, self.current_user) {
            (Some(token), Some(user)) => {
                token::ensure_subject(token, &user)?;
                Some(user)
            }
            (None, Some(_)) => {
                tracing::warn!("cached user given without a token; ignoring it");
                None
            }
            (_, None) => None,
        };

        let session = Session::new(self.token, current_user, self.on_token_changed);
        Ok(BlogClient {
            http: BlogHttp::new(&self.host, client, session),
        })
    }
}
