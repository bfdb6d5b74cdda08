//! Common test utilities for API integration tests
//!
//! In-memory fakes for every pipeline collaborator plus helpers for tokens,
//! routers and response bodies.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
