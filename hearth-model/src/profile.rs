//! Locally buffered profile edits.

use serde::{Deserialize, Serialize};

/// Form fields a user can edit on the profile view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// The unique username
    Username,
    /// The account email address
    Email,
    /// A replacement password (never stored locally beyond the buffer)
    Password,
}

/// Locally buffered, not-yet-submitted field changes for the current user.
///
/// Untouched fields stay `None` and are skipped during serialization, so the
/// update payload carries exactly the keys the user changed. The `avatar`
/// field is only ever set from a completed upload's retrievable URL, never
/// from a local file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingEdits {
    /// New username, if edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email, if edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password, if edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Retrievable URL of a freshly uploaded avatar image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl PendingEdits {
    /// Merge one edited form field into the buffer.
    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Username => self.username = Some(value),
            ProfileField::Email => self.email = Some(value),
            ProfileField::Password => self.password = Some(value),
        }
    }

    /// True when no field has been touched yet.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.avatar.is_none()
    }
}
