//! Data models for the Moodscape API
//!
//! This module contains:
//! - Authentication claims issued by the auth provider
//! - Chat trigger request types
//! - Scenery records and their transient counterpart

pub mod chat;
pub mod scenery;
pub mod user;

pub use chat::{ChatRequest, IncomingMessage, PRIVATE_SCENERY_MODEL};
pub use scenery::{GeneratedContent, SceneryOutcome, SceneryRecord};
pub use user::{Claims, SceneryUser};
