//! Profile service trait and API adapter
//!
//! Provides abstraction over the three account operations the profile view
//! performs, so the domain layer can be exercised against mocks.

use async_trait::async_trait;
use hearth_model::{PendingEdits, User};
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::api_client::{ApiClient, ApiError};

/// Account operations available to the profile view.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Submit the touched fields for the given user, returning the updated
    /// record.
    async fn update_profile(
        &self,
        user_id: Uuid,
        edits: &PendingEdits,
    ) -> Result<User, ApiError>;

    /// Permanently delete the given user's account.
    async fn delete_account(&self, user_id: Uuid) -> Result<(), ApiError>;

    /// End the current session server-side.
    async fn sign_out(&self) -> Result<(), ApiError>;
}

/// Backend-HTTP implementation of [`ProfileService`].
#[derive(Clone)]
pub struct ProfileApiAdapter {
    client: Arc<ApiClient>,
}

impl ProfileApiAdapter {
    /// Wrap an API client.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for ProfileApiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileApiAdapter").finish()
    }
}

#[async_trait]
impl ProfileService for ProfileApiAdapter {
    async fn update_profile(
        &self,
        user_id: Uuid,
        edits: &PendingEdits,
    ) -> Result<User, ApiError> {
        info!("Updating profile for user {user_id}");
        self.client
            .post(&format!("/user/update/{user_id}"), edits)
            .await
    }

    async fn delete_account(&self, user_id: Uuid) -> Result<(), ApiError> {
        info!("Deleting account {user_id}");
        // The response body carries nothing this client needs.
        self.client
            .delete_no_content(&format!("/user/delete/{user_id}"))
            .await
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        info!("Signing out current session");
        self.client.get_no_content("/auth/signout").await?;
        // The session is gone server-side; drop the local token as well.
        self.client.set_token(None).await;
        Ok(())
    }
}
