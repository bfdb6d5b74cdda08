//! Health check service for verifying external dependencies
//!
//! Readiness covers the record database (when persistence is on) and the
//! polling music provider (when it is the selected audio backend).

use moodscape_audio_client::SunoClient;
use serde::Serialize;
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
    /// Service check was skipped (e.g., optional service not configured)
    Skipped,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional details about the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceHealth {
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: None,
            details: None,
        }
    }

    pub fn healthy_with_details(
        name: &'static str,
        response_time: Duration,
        details: serde_json::Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::healthy(name, response_time)
        }
    }

    pub fn unhealthy_with_time(
        name: &'static str,
        error: impl Into<String>,
        response_time: Duration,
    ) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: Some(error.into()),
            details: None,
        }
    }

    /// Create a skipped service result (for optional services not configured)
    pub fn skipped(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            status: ServiceStatus::Skipped,
            response_time_ms: None,
            error: None,
            details: Some(serde_json::json!({ "reason": reason.into() })),
        }
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if all required services are healthy)
    pub status: ServiceStatus,
    /// Individual service health results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all health checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services
            .iter()
            .all(|s| s.status != ServiceStatus::Unhealthy)
        {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service for verifying external dependencies
#[derive(Clone, Default)]
pub struct HealthService {
    pool: Option<PgPool>,
    suno: Option<SunoClient>,
}

impl HealthService {
    /// `None` for either dependency reports it as skipped
    pub fn new(pool: Option<PgPool>, suno: Option<SunoClient>) -> Self {
        Self { pool, suno }
    }

    /// Check PostgreSQL connectivity on the shared pool
    pub async fn check_database(&self) -> ServiceHealth {
        let Some(pool) = &self.pool else {
            return ServiceHealth::skipped("database", "Record persistence disabled");
        };

        let start = Instant::now();
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
            Ok(_) => ServiceHealth::healthy("database", start.elapsed()),
            Err(e) => ServiceHealth::unhealthy_with_time(
                "database",
                format!("Query failed: {}", e),
                start.elapsed(),
            ),
        }
    }

    /// Check the music provider by reading the account quota
    pub async fn check_audio(&self) -> ServiceHealth {
        let Some(suno) = &self.suno else {
            return ServiceHealth::skipped("suno", "Polling audio backend not selected");
        };

        let start = Instant::now();
        match suno.get_quota().await {
            Ok(quota) => ServiceHealth::healthy_with_details(
                "suno",
                start.elapsed(),
                serde_json::json!({
                    "credits_left": quota.credits_left,
                    "monthly_limit": quota.monthly_limit,
                    "monthly_usage": quota.monthly_usage,
                }),
            ),
            Err(e) => ServiceHealth::unhealthy_with_time(
                "suno",
                format!("Quota request failed: {}", e),
                start.elapsed(),
            ),
        }
    }

    /// Run all health checks in parallel
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();

        let (db_health, audio_health) = tokio::join!(self.check_database(), self.check_audio());

        HealthCheckResponse::new(vec![db_health, audio_health], start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodscape_shared_config::SunoConfig;
    use moodscape_test_utils::MockSunoServer;

    #[test]
    fn test_service_health_healthy() {
        let health = ServiceHealth::healthy("test", Duration::from_millis(50));
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert_eq!(health.response_time_ms, Some(50));
        assert!(health.error.is_none());
    }

    #[test]
    fn test_health_check_response_one_unhealthy() {
        let services = vec![
            ServiceHealth::healthy("database", Duration::from_millis(10)),
            ServiceHealth::unhealthy_with_time("suno", "Connection refused", Duration::ZERO),
        ];
        let response = HealthCheckResponse::new(services, Duration::from_millis(15));
        assert!(!response.is_healthy());
    }

    #[tokio::test]
    async fn test_nothing_configured_is_healthy() {
        let response = HealthService::default().check_all().await;
        assert!(response.is_healthy());
        assert!(response
            .services
            .iter()
            .all(|s| s.status == ServiceStatus::Skipped));
    }

    #[tokio::test]
    async fn test_audio_check_reads_quota() {
        let server = MockSunoServer::start().await;
        server.mock_quota(42).await;

        let suno = SunoClient::new(&SunoConfig::with_url(server.url())).unwrap();
        let health = HealthService::new(None, Some(suno)).check_audio().await;

        assert_eq!(health.status, ServiceStatus::Healthy);
        assert_eq!(health.details.unwrap()["credits_left"], 42);
    }

    #[tokio::test]
    async fn test_audio_check_unreachable() {
        let suno = SunoClient::new(&SunoConfig::with_url("http://127.0.0.1:1")).unwrap();
        let health = HealthService::new(None, Some(suno)).check_audio().await;
        assert_eq!(health.status, ServiceStatus::Unhealthy);
    }
}
