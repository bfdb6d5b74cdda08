//! HTTP route handlers for the Moodscape API
//!
//! - Chat trigger endpoint (scenery pipeline)
//! - Health check and status endpoints

pub mod chat;
pub mod health;

pub use chat::{chat_router, ChatState};
pub use health::{health_router, HealthState};
