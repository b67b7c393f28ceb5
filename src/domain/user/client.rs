//! Users sub-client — profiles, lookup, account updates.

use serde_json::Value;

use crate::client::BlogClient;
use crate::domain::post::Post;
use crate::domain::user::{PublicUser, UpdateUser, User};
use crate::error::SdkError;
use crate::shared::{Updated, UserId};

/// Sub-client for user operations.
pub struct Users<'a> {
    pub(crate) client: &'a BlogClient,
}

impl<'a> Users<'a> {
    pub async fn all(&self) -> Result<Vec<PublicUser>, SdkError> {
        self.client.http.get("users").await
    }

    pub async fn get(&self, id: UserId) -> Result<PublicUser, SdkError> {
        self.client.http.get(&format!("users/{}", id)).await
    }

    /// Look a user up by username. The name is percent-encoded into the path.
    pub async fn by_name(&self, username: &str) -> Result<PublicUser, SdkError> {
        let path = format!("users/by-name/{}", urlencoding::encode(username));
        self.client.http.get(&path).await
    }

    /// Full profile of the account the current token belongs to.
    ///
    /// Does not touch the cached `current_user`; use
    /// `auth().authenticate(..)` or `auth().refresh_token()` for that.
    pub async fn me(&self) -> Result<User, SdkError> {
        self.client.http.get("users/me").await
    }

    pub async fn update(&self, id: UserId, update: &UpdateUser) -> Result<Updated, SdkError> {
        self.client.http.put(&format!("users/{}", id), update).await
    }

    pub async fn delete(&self, id: UserId) -> Result<(), SdkError> {
        let _: Value = self.client.http.delete(&format!("users/{}", id)).await?;
        Ok(())
    }

    /// Posts written by `id`, newest first. Members-only posts are included
    /// only when the request is authenticated.
    pub async fn posts(&self, id: UserId) -> Result<Vec<Post>, SdkError> {
        self.client.http.get(&format!("users/{}/posts", id)).await
    }
}
