//! Wire-level API types shared between client crates.

use serde::{Deserialize, Serialize};

/// Body shape of a structured backend rejection.
///
/// The backend reports validation-level failures (duplicate email, bad
/// credentials) as a well-formed JSON body with `success: false` and a
/// human-readable message. Anything that does not parse into this shape is
/// treated as a transport-level failure by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailureBody {
    /// Always `false` for rejections; present so the shape is unambiguous
    pub success: bool,
    /// Human-readable reason, surfaced to the user verbatim
    pub message: String,
}
