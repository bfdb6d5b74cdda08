//! Error handling for the Moodscape API
//!
//! A single error type with HTTP status mapping via Axum's IntoResponse.
//! Pipeline failures keep the `{ success: false, error }` envelope the chat
//! client expects; everything else renders as an [`ErrorResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::scenery::PipelineError;

/// Message returned to clients when a scenery run fails
pub const SCENERY_FAILURE_MESSAGE: &str = "Failed to generate AI content";

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Envelope for failed scenery runs
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: &'static str,
}

#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Invalid or missing authentication credentials
    #[error("authentication required")]
    Unauthorized,

    /// Invalid token (expired, malformed, etc.)
    #[error("invalid authentication token: {0}")]
    InvalidToken(String),

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Invalid request body format
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Only the scenery model is served by this API
    #[error("unsupported chat model: {0}")]
    UnsupportedChatModel(String),

    // ========== Pipeline ==========
    /// A scenery run failed after validation
    #[error("scenery generation failed: {0}")]
    Scenery(PipelineError),

    // ========== Internal Errors ==========
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,

            Self::ValidationError(_) | Self::InvalidBody(_) | Self::UnsupportedChatModel(_) => {
                StatusCode::BAD_REQUEST
            }

            Self::Scenery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::UnsupportedChatModel(_) => "UNSUPPORTED_CHAT_MODEL",
            Self::Scenery(PipelineError::InvalidInput(_)) => "VALIDATION_ERROR",
            Self::Scenery(PipelineError::GenerationFailed(_)) => "GENERATION_FAILED",
            Self::Scenery(PipelineError::ImageDecodeFailed(_)) => "IMAGE_DECODE_FAILED",
            Self::Scenery(PipelineError::StorageUploadFailed(_)) => "STORAGE_UPLOAD_FAILED",
            Self::Scenery(PipelineError::PersistenceFailed(_)) => "PERSISTENCE_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();

        if let Self::Scenery(_) = &self {
            let envelope = FailureEnvelope {
                success: false,
                error: SCENERY_FAILURE_MESSAGE,
            };
            return (status, Json(envelope)).into_response();
        }

        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(message) => Self::ValidationError(message),
            other => Self::Scenery(other),
        }
    }
}
