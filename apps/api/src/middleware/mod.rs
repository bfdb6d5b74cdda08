//! Middleware components for the Moodscape API
//!
//! - `AuthUser`: requires a valid access token, returns 401 if missing/invalid

pub mod auth;

pub use auth::AuthUser;
