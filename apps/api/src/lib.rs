//! Moodscape API library
//!
//! Exposes the pipeline, its collaborators and the router for the binary and
//! the integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use app::{build_cors_layer, build_router};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use services::{AuthConfig, AuthService, SceneryPipeline};
