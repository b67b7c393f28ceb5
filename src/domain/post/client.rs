//! Posts sub-client — list, read, write.

use crate::client::BlogClient;
use crate::domain::post::{CreatePost, Post, UpdatePost};
use crate::error::SdkError;
use crate::shared::{Deleted, PostId, Updated};

/// Sub-client for post operations.
pub struct Posts<'a> {
    pub(crate) client: &'a BlogClient,
}

impl<'a> Posts<'a> {
    /// Every post visible to the caller.
    pub async fn all(&self) -> Result<Vec<Post>, SdkError> {
        self.client.http.get("posts").await
    }

    pub async fn get(&self, id: PostId) -> Result<Post, SdkError> {
        self.client.http.get(&format!("posts/{}", id)).await
    }

    /// Publish a post as the logged-in user.
    ///
    /// Field rules (non-empty content and so on) are enforced by the server
    /// and come back as [`ApiError::Validation`](crate::error::ApiError::Validation).
    pub async fn create(&self, post: &CreatePost) -> Result<Post, SdkError> {
        let created: Post = self.client.http.post("posts", post).await?;
        tracing::debug!(id = %created.id, "post created");
        Ok(created)
    }

    pub async fn update(&self, id: PostId, update: &UpdatePost) -> Result<Updated, SdkError> {
        self.client.http.put(&format!("posts/{}", id), update).await
    }

    pub async fn delete(&self, id: PostId) -> Result<Deleted, SdkError> {
        self.client.http.delete(&format!("posts/{}", id)).await
    }
}
