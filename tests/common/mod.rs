//! Shared test utilities
//!
//! - Session and response fixtures
//! - A console harness wired to a wiremock server

pub mod fixtures;
pub mod server;
