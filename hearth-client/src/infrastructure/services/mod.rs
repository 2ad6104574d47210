//! Service traits and their API-backed adapters.

pub mod avatar_store;
pub mod profile;
