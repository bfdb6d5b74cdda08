//! Chat trigger route
//!
//! - `POST /chat` - run the scenery pipeline for the most recent user message
//!
//! Only the `private-scenery` model is served here. Other chat models are
//! rejected with `UNSUPPORTED_CHAT_MODEL`.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{
    ChatRequest, GeneratedContent, SceneryOutcome, SceneryRecord, PRIVATE_SCENERY_MODEL,
};
use crate::services::SceneryPipeline;

/// Shared application state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    pub pipeline: Arc<SceneryPipeline>,
}

impl ChatState {
    pub fn new(pipeline: SceneryPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Success envelope; exactly one payload field is present
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenery_data: Option<SceneryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<GeneratedContent>,
}

impl From<SceneryOutcome> for SceneryResponse {
    fn from(outcome: SceneryOutcome) -> Self {
        match outcome {
            SceneryOutcome::Persisted(record) => Self {
                success: true,
                scenery_data: Some(record),
                generated_content: None,
            },
            SceneryOutcome::Transient(content) => Self {
                success: true,
                scenery_data: None,
                generated_content: Some(content),
            },
        }
    }
}

/// Create chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(state)
}

async fn chat(
    State(state): State<ChatState>,
    auth: AuthUser,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<SceneryResponse>> {
    let Json(request) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let message = request
        .most_recent_user_message()
        .ok_or_else(|| ApiError::ValidationError("No user message found".to_string()))?;

    if request.selected_chat_model != PRIVATE_SCENERY_MODEL {
        return Err(ApiError::UnsupportedChatModel(
            request.selected_chat_model.clone(),
        ));
    }

    tracing::info!(
        correlation_id = %request.id,
        user_id = %auth.user.id,
        "Scenery requested"
    );

    let outcome = state
        .pipeline
        .run(&message.text(), &request.id, &auth.user)
        .await?;

    Ok(Json(SceneryResponse::from(outcome)))
}
