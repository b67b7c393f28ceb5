//! Auth sub-client — login, register, token validation, refresh, logout.

use std::sync::Arc;

use serde_json::Value;

use crate::auth::token::{self, TokenClaims};
use crate::auth::{AuthUser, ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::client::BlogClient;
use crate::domain::user::User;
use crate::error::{ApiError, AuthError, ProblemDetails, SdkError};

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a BlogClient,
}

impl<'a> Auth<'a> {
    /// Log in with username and password.
    ///
    /// On success the returned token and profile become the session and the
    /// hook fires once. On failure the session is untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SdkError> {
        let request = LoginRequest { username, password };
        let auth: AuthUser = self.client.http.post("auth/login", &request).await?;
        tracing::info!(username = %auth.user.username, "logged in");
        self.commit(auth).await
    }

    /// Create an account and log into it.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<User, SdkError> {
        let request = RegisterRequest {
            username,
            password,
            email,
        };
        let auth: AuthUser = self.client.http.post("auth/register", &request).await?;
        tracing::info!(username = %auth.user.username, "registered");
        self.commit(auth).await
    }

    /// Adopt `token` after the server has accepted it.
    ///
    /// The candidate is installed before `GET auth/validate` so that call (and
    /// the following `GET users/me`) present it. If either call fails, or the
    /// server answers `false`, the previous token is put back (or none, if
    /// there was none) and the hook does not fire.
    pub async fn authenticate(&self, token: &str) -> Result<User, SdkError> {
        let prior = self.client.http.session().write().await.install_candidate(token);

        match self.validate_candidate(token).await {
            Ok(user) => {
                self.client
                    .http
                    .session()
                    .write()
                    .await
                    .commit(Some(token.to_string()), Some(user.clone()));
                tracing::info!(username = %user.username, "authenticated with token");
                Ok(user)
            }
            Err(e) => {
                let restored = self
                    .client
                    .http
                    .session()
                    .write()
                    .await
                    .rollback(token, prior);
                tracing::warn!(restored, "token rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Adopt `token` without asking the server.
    ///
    /// The cached user survives only if the token's subject claim names it.
    pub async fn authenticate_unchecked(&self, token: &str) {
        let mut session = self.client.http.session().write().await;
        let user = session
            .current_user()
            .filter(|u| token::user_matches(token, u))
            .cloned();
        session.commit(Some(token.to_string()), user);
        tracing::debug!("token set without validation");
    }

    /// Exchange the current token for a fresh one.
    pub async fn refresh_token(&self) -> Result<User, SdkError> {
        self.require_token().await?;
        let auth: AuthUser = self.client.http.post_empty("auth/refresh-token").await?;
        tracing::debug!("token refreshed");
        self.commit(auth).await
    }

    /// End the session.
    ///
    /// With `track`, the server is told first (`POST auth/logout`). The local
    /// session is cleared either way; a server failure is still returned.
    /// Returns `false` if there was no session to end.
    pub async fn logout(&self, track: bool) -> Result<bool, SdkError> {
        if !self.is_authenticated().await {
            return Ok(false);
        }

        let server = if track {
            self.client
                .http
                .post_empty::<Value>("auth/logout")
                .await
                .map(|_| ())
        } else {
            Ok(())
        };

        let cleared = self.client.http.session().write().await.clear();

        match server {
            Ok(()) => {
                tracing::info!(track, "logged out");
                Ok(cleared)
            }
            Err(e) => {
                tracing::warn!("server logout failed, local session cleared: {}", e);
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, new_password: &str) -> Result<(), SdkError> {
        self.require_token().await?;
        let request = ChangePasswordRequest {
            password: new_password,
        };
        let _: Value = self
            .client
            .http
            .post("auth/change-password", &request)
            .await?;
        Ok(())
    }

    // ── Session accessors ────────────────────────────────────────────────

    pub async fn is_authenticated(&self) -> bool {
        self.client.http.session().read().await.is_authenticated()
    }

    pub async fn token(&self) -> Option<String> {
        self.client
            .http
            .session()
            .read()
            .await
            .token()
            .map(str::to_string)
    }

    /// Cached profile of the logged-in user. May lag behind the server.
    pub async fn current_user(&self) -> Option<User> {
        self.client.http.session().read().await.current_user().cloned()
    }

    /// Claims of the current token, if it is a decodable JWT.
    pub async fn claims(&self) -> Option<TokenClaims> {
        let token = self.token().await?;
        TokenClaims::decode(&token).ok()
    }

    /// Install the change-notification hook, replacing any previous one.
    pub async fn set_on_token_changed<F>(&self, hook: F)
    where
        F: Fn(Option<&str>, Option<&User>) + Send + Sync + 'static,
    {
        self.client
            .http
            .session()
            .write()
            .await
            .set_hook(Some(Arc::new(hook)));
    }

    pub async fn clear_on_token_changed(&self) {
        self.client.http.session().write().await.set_hook(None);
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn validate_candidate(&self, token: &str) -> Result<User, SdkError> {
        let valid: bool = self.client.http.get("auth/validate").await?;
        if !valid {
            return Err(ApiError::Generic(ProblemDetails {
                problem_type: "Unauthorized".to_string(),
                title: "Invalid token".to_string(),
                status: 401,
                detail: Some("The server did not accept the token.".to_string()),
            })
            .into());
        }
        let user: User = self.client.http.get("users/me").await?;
        token::ensure_subject(token, &user)?;
        Ok(user)
    }

    async fn commit(&self, auth: AuthUser) -> Result<User, SdkError> {
        let AuthUser { token, user } = auth;
        token::ensure_subject(&token, &user)?;
        self.client
            .http
            .session()
            .write()
            .await
            .commit(Some(token), Some(user.clone()));
        Ok(user)
    }

    async fn require_token(&self) -> Result<(), SdkError> {
        if self.is_authenticated().await {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated.into())
        }
    }
}
