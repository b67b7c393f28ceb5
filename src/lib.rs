//! # Blog API client
//!
//! A typed client for the blog backend's REST API: users, posts, mutes and
//! bearer-token authentication.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Error taxonomy, shared newtypes, domain resources (always available)
//! 2. **Auth** — Session state, token claims, login/logout transitions
//! 3. **HTTP API** — `BlogHttp`: one generic dispatch plus failure classification
//! 4. **High-Level Client** — `BlogClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blog_api::prelude::*;
//!
//! let client = BlogClient::builder()
//!     .host("http://localhost:5233")
//!     .on_token_changed(|token, _user| save(token))
//!     .build()?;
//!
//! client.auth().login("admin", "secret").await?;
//! let post = client.posts().create(&CreatePost::new("Hello", "First post")).await?;
//!
//! match client.posts().create(&CreatePost::new("Empty", "")).await {
//!     Err(e) => {
//!         if let Some(v) = e.downcast::<ValidationErrors>() {
//!             println!("{:?}", v.errors);
//!         }
//!     }
//!     Ok(_) => {}
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and response types used across all domains.
pub mod shared;

/// Domain modules (vertical slices): resources, request bodies, sub-clients.
pub mod domain;

/// Error taxonomy and SDK error types.
pub mod error;

/// Network defaults.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: session state, token claims, login/logout.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP dispatcher and failure classification.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `BlogClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Deleted, PostId, Updated, UserId};

    // Domain types
    pub use crate::domain::mute::MutedUser;
    pub use crate::domain::post::{CreatePost, Post, UpdatePost};
    pub use crate::domain::user::{PublicUser, UpdateUser, User};

    // Errors
    pub use crate::error::{
        try_downcast, ApiError, ApiErrorKind, AuthError, ErrorPayload, ProblemDetails, SdkError,
        TransportFailure, ValidationErrors,
    };

    // Network
    pub use crate::network::DEFAULT_HOST;

    // Auth types
    pub use crate::auth::{TokenChangedHook, TokenClaims};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AuthClient, BlogClient, BlogClientBuilder, MutesClient, PostsClient, UsersClient,
    };
}
