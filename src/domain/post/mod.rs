//! Post domain — blog posts and their create/update payloads.

#[cfg(feature = "http")]
pub mod client;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::PublicUser;
use crate::shared::serde_util::{timestamp, timestamp_opt};
use crate::shared::{PostId, UserId};

/// A published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub caption: String,
    pub content: String,
    #[serde(default, with = "timestamp_opt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub user_id: UserId,
    /// Author, when the backend embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
    #[serde(rename = "registredUsersOnly")]
    pub registered_users_only: bool,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePost {
    pub caption: String,
    pub content: String,
    #[serde(rename = "registredUsersOnly", default)]
    pub registered_users_only: bool,
}

impl CreatePost {
    pub fn new(caption: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            content: content.into(),
            registered_users_only: false,
        }
    }

    pub fn registered_users_only(mut self, only: bool) -> Self {
        self.registered_users_only = only;
        self
    }
}

/// Body of `PUT /posts/{id}`. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "registredUsersOnly", skip_serializing_if = "Option::is_none")]
    pub registered_users_only: Option<bool>,
}
