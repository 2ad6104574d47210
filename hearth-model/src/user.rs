//! The signed-in user's profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core user type as returned by the backend.
///
/// The client never patches this record field-by-field: a successful profile
/// update replaces it wholesale with the response body, and deleting the
/// account or signing out clears it entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique username
    pub username: String,
    /// Email address
    pub email: String,
    /// Optional URL to the user's avatar image
    pub avatar_url: Option<String>,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of last profile update
    pub updated_at: DateTime<Utc>,
}
