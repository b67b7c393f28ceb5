//! Mutes sub-client.

use serde_json::Value;

use crate::client::BlogClient;
use crate::domain::mute::MutedUser;
use crate::error::SdkError;
use crate::shared::UserId;

pub struct Mutes<'a> {
    pub(crate) client: &'a BlogClient,
}

impl<'a> Mutes<'a> {
    /// Users the logged-in user has muted.
    pub async fn list(&self) -> Result<Vec<MutedUser>, SdkError> {
        self.client.http.get("muted-users").await
    }

    /// The request body is the bare id as a JSON string.
    pub async fn mute(&self, id: UserId) -> Result<(), SdkError> {
        let _: Value = self.client.http.post("muted-users", &id).await?;
        Ok(())
    }

    pub async fn unmute(&self, id: UserId) -> Result<(), SdkError> {
        let _: Value = self
            .client
            .http
            .delete(&format!("muted-users/{}", id))
            .await?;
        Ok(())
    }
}
