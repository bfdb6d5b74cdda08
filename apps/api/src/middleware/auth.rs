//! Authentication extractor for Axum handlers
//!
//! `AuthUser` requires a valid bearer token issued by the auth provider and
//! returns 401 otherwise. The handler runs only after the token is verified.
//!
//! ```rust,ignore
//! async fn handler(auth: AuthUser) -> impl IntoResponse {
//!     format!("User ID: {}", auth.user.id)
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, ErrorResponse};
use crate::models::{Claims, SceneryUser};
use crate::services::AuthService;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity records are attributed to
    pub user: SceneryUser,
    /// JWT claims from the access token
    pub claims: Claims,
}

/// Authentication rejection types
#[derive(Debug)]
pub enum AuthRejection {
    /// Missing or invalid Authorization header
    MissingToken,
    /// Token is malformed or expired
    InvalidToken(String),
    /// AuthService was not installed on the router
    MissingServices,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthRejection::MissingToken => {
                tracing::debug!("Authentication rejected: missing token");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            AuthRejection::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Authentication rejected: invalid token");
                (StatusCode::UNAUTHORIZED, ApiError::InvalidToken(reason))
            }
            AuthRejection::MissingServices => {
                tracing::error!("Authentication rejected: missing services in app state");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::Internal("Authentication services not configured".to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: error.error_code(),
            message: error.to_string(),
        });

        (status, body).into_response()
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let auth_service = parts
            .extensions
            .get::<AuthService>()
            .ok_or(AuthRejection::MissingServices)?;

        let claims = auth_service
            .verify_access_token(token)
            .map_err(|e| AuthRejection::InvalidToken(e.to_string()))?;

        Ok(AuthUser {
            user: SceneryUser::from(&claims),
            claims,
        })
    }
}
