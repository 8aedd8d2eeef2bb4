//! Integration tests for the admin console core
//!
//! These tests drive the real reqwest transport against a local mock server.

#[path = "../common/mod.rs"]
pub mod common;

pub mod navigation_flow;
pub mod pipeline_flow;
pub mod sign_in_flow;
