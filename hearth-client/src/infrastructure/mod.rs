//! Infrastructure layer: HTTP plumbing and service adapters.

pub mod api_client;
pub mod services;
