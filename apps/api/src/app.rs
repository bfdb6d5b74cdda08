//! Router assembly shared by the binary and the integration tests

use axum::{
    extract::Extension,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::routes::{chat_router, health_router, ChatState, HealthState};
use crate::services::AuthService;

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    cors_layer_for(config.cors_allowed_origins.as_deref(), config.is_production())
}

fn cors_layer_for(origins: Option<&[String]>, is_production: bool) -> CorsLayer {
    match origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([
                        header::AUTHORIZATION,
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                        header::ORIGIN,
                    ])
                    .allow_credentials(true)
                    .max_age(std::time::Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// Assemble the full application router
///
/// - `GET /` banner
/// - `/health`, `/health/live`, `/health/ready`
/// - `POST /api/chat`
pub fn build_router(
    chat_state: ChatState,
    health_state: HealthState,
    auth_service: AuthService,
    cors_layer: CorsLayer,
) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/health", health_router(health_state))
        .nest("/api", chat_router(chat_state))
        .layer(Extension(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
}

async fn root() -> &'static str {
    "Welcome to Moodscape - turn a mood into scenery"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};
    use tower::ServiceExt;

    async fn preflight(layer: CorsLayer, origin: &str) -> Option<HeaderValue> {
        let app = Router::new().route("/", get(root)).layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_configured_origin_allowed() {
        let origins = vec!["https://moodscape.app".to_string()];
        let allowed = preflight(cors_layer_for(Some(&origins), true), "https://moodscape.app").await;
        assert_eq!(allowed.unwrap(), "https://moodscape.app");
    }

    #[tokio::test]
    async fn test_production_without_origins_rejects() {
        assert!(preflight(cors_layer_for(None, true), "https://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn test_development_is_permissive() {
        assert!(preflight(cors_layer_for(None, false), "http://localhost:3000").await.is_some());
    }
}
