//! Test helper functions for API integration tests
//!
//! Token minting, pipeline and router construction, and response decoding.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use moodscape_api::models::{Claims, SceneryUser};
use moodscape_api::repositories::RecordStore;
use moodscape_api::routes::{ChatState, HealthState};
use moodscape_api::services::{AuthConfig, AuthService, HealthService, SceneryPipeline};
use moodscape_api::build_router;
use tower_http::cors::CorsLayer;

use super::fixtures::PipelineFakes;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-at-least-32-characters";

/// Mint an access token the way the auth provider would
pub fn access_token(user_id: &str, email: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(email.to_string()),
        exp: chrono::Utc::now().timestamp() + 3600,
        aud: "authenticated".to_string(),
        role: Some("authenticated".to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

pub fn test_user() -> SceneryUser {
    SceneryUser {
        id: "user-123".to_string(),
        email: "mood@example.com".to_string(),
    }
}

/// Pipeline over the given fakes; `persist` decides whether records are stored
pub fn pipeline(fakes: &PipelineFakes, persist: bool) -> SceneryPipeline {
    let records = persist.then(|| fakes.records.clone() as Arc<dyn RecordStore>);
    SceneryPipeline::new(
        fakes.generator.clone(),
        fakes.images.clone(),
        fakes.audio.clone(),
        records,
    )
}

/// Full application router over the given fakes
pub fn test_app(fakes: &PipelineFakes, persist: bool) -> Router {
    build_router(
        ChatState::new(pipeline(fakes, persist)),
        HealthState::new(HealthService::default()),
        AuthService::new(AuthConfig::new(TEST_JWT_SECRET.to_string())),
        CorsLayer::permissive(),
    )
}

/// `POST /api/chat` with an optional bearer token
pub fn chat_request(body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn scenery_body(mood: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chat-42",
        "messages": [
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "How do you feel?"},
            {"role": "user", "content": mood}
        ],
        "selectedChatModel": "private-scenery"
    })
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
