//! Hearth client core
//!
//! This crate contains the headless library behind the Hearth client's
//! profile surface: the API client, backend and object-storage services, the
//! shared user store, and the profile domain controller. Rendering and
//! routing live in the client shell; everything here is exposed as a library
//! to enable testing and internal reuse.

pub mod config;
pub mod domains;
pub mod infrastructure;
pub mod store;
