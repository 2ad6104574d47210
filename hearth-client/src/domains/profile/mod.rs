//! Profile domain
//!
//! Headless controller for the signed-in user's profile: collects field
//! edits, tracks one avatar transfer at a time, and runs the update, delete
//! and sign-out operations against the backend, reporting their lifecycle
//! into the shared user store.

pub mod state;

use hearth_model::ProfileField;
use log::{error, info, warn};
use std::sync::Arc;

use crate::infrastructure::services::avatar_store::{AvatarStore, UploadEvent, UploadHandle};
use crate::infrastructure::services::profile::ProfileService;
use crate::store::{UserAction, UserStore};
use state::{ProfileState, UploadProgress, UploadStatus};

/// The profile view's controller.
///
/// Owns the transient form state and the active upload handle; reads the
/// signed-in user from the shared store and dispatches operation lifecycles
/// back into it. Errors are terminal for their one operation and leave the
/// edited state in place for a manual retry.
pub struct ProfileView {
    state: ProfileState,
    store: UserStore,
    profile: Arc<dyn ProfileService>,
    avatars: Arc<dyn AvatarStore>,
    active_upload: Option<UploadHandle>,
}

impl std::fmt::Debug for ProfileView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileView")
            .field("state", &self.state)
            .field("has_active_upload", &self.active_upload.is_some())
            .finish()
    }
}

impl ProfileView {
    /// Wire the controller to its collaborators.
    pub fn new(
        store: UserStore,
        profile: Arc<dyn ProfileService>,
        avatars: Arc<dyn AvatarStore>,
    ) -> Self {
        Self {
            state: ProfileState::default(),
            store,
            profile,
            avatars,
            active_upload: None,
        }
    }

    /// The view's transient state.
    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// What the avatar status line currently shows.
    pub fn upload_status(&self) -> UploadStatus {
        self.state.upload.status()
    }

    /// True while a transfer handle is being tracked.
    pub fn has_active_upload(&self) -> bool {
        self.active_upload.is_some()
    }

    /// A new file was picked in the file dialog.
    ///
    /// Any transfer still in flight is aborted before the new one starts; a
    /// stale subscription would otherwise race the new transfer for the
    /// pending avatar slot.
    pub fn select_file(&mut self, file_name: &str, bytes: Vec<u8>) {
        if let Some(mut previous) = self.active_upload.take() {
            warn!("Aborting in-flight avatar upload superseded by {file_name:?}");
            previous.abort();
        }
        self.state.upload = UploadProgress::default();
        self.active_upload = Some(self.avatars.upload(file_name, bytes));
    }

    /// Apply one event from the active transfer.
    pub fn apply_upload_event(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Progress(percent) => {
                // Monotonic within one transfer; out-of-order lower values
                // are dropped rather than rolled back.
                let clamped = percent.min(100);
                if clamped >= self.state.upload.percent {
                    self.state.upload.percent = clamped;
                }
            }
            UploadEvent::Failed(message) => {
                // The message is logged only; the view renders a fixed
                // warning off the flag. Percent stays where it was.
                error!("Avatar upload failed: {message}");
                self.state.upload.failed = true;
            }
            UploadEvent::Completed(url) => {
                info!("Avatar uploaded to {url}");
                self.state.pending.avatar = Some(url);
                self.state.upload.failed = false;
            }
        }
    }

    /// Drain the active transfer's events until it terminates.
    pub async fn drive_upload(&mut self) {
        loop {
            let event = match self.active_upload.as_mut() {
                Some(handle) => handle.next_event().await,
                None => return,
            };
            match event {
                Some(event) => self.apply_upload_event(event),
                None => {
                    self.active_upload = None;
                    return;
                }
            }
        }
    }

    /// Merge one edited form field into the pending buffer. No client-side
    /// validation; the backend owns format and uniqueness rules.
    pub fn edit_field(&mut self, field: ProfileField, value: String) {
        self.state.pending.set(field, value);
    }

    /// Submit the touched fields for the signed-in user.
    ///
    /// Pending edits and the success flag are left in place afterwards; the
    /// caller decides when to reset them.
    pub async fn submit(&mut self) {
        let Some(user) = self.store.state().current_user else {
            warn!("Profile submit with no signed-in user");
            self.store
                .dispatch(UserAction::UpdateFailure("Not signed in".to_string()));
            return;
        };

        self.store.dispatch(UserAction::UpdateStart);
        let result = self.profile.update_profile(user.id, &self.state.pending).await;
        match result {
            Ok(updated) => {
                info!("Profile updated for {}", updated.username);
                self.state.update_success = true;
                self.store.dispatch(UserAction::UpdateSuccess(updated));
            }
            Err(e) => {
                error!("Profile update failed: {e}");
                self.store
                    .dispatch(UserAction::UpdateFailure(e.surface_message().to_string()));
            }
        }
    }

    /// Permanently delete the signed-in user's account. The shared state
    /// reacts by clearing the user; session teardown is the shell's job.
    pub async fn delete_account(&mut self) {
        let Some(user) = self.store.state().current_user else {
            warn!("Account deletion with no signed-in user");
            self.store
                .dispatch(UserAction::DeleteFailure("Not signed in".to_string()));
            return;
        };

        self.store.dispatch(UserAction::DeleteStart);
        match self.profile.delete_account(user.id).await {
            Ok(()) => {
                info!("Account {} deleted", user.id);
                self.store.dispatch(UserAction::DeleteSuccess);
            }
            Err(e) => {
                error!("Account deletion failed: {e}");
                self.store
                    .dispatch(UserAction::DeleteFailure(e.surface_message().to_string()));
            }
        }
    }

    /// End the current session.
    pub async fn sign_out(&mut self) {
        self.store.dispatch(UserAction::SignOutStart);
        match self.profile.sign_out().await {
            Ok(()) => {
                info!("Signed out");
                self.store.dispatch(UserAction::SignOutSuccess);
            }
            Err(e) => {
                error!("Sign-out failed: {e}");
                self.store
                    .dispatch(UserAction::SignOutFailure(e.surface_message().to_string()));
            }
        }
    }
}
