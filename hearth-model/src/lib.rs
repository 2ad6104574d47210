//! Core data model definitions shared across Hearth crates.

pub mod api;
pub mod profile;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use api::ApiFailureBody;
pub use profile::{PendingEdits, ProfileField};
pub use user::User;
