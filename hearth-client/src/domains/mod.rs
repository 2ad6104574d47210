//! UI domains: headless controllers for the client's views.

pub mod profile;
