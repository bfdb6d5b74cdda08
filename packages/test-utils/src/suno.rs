//! Mock music job API for testing submission and polling
//!
//! Provides a [`MockSunoServer`] whose status endpoint walks through a
//! scripted sequence of clip states, one per poll.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Replies with the next status in the script; the last one repeats
struct StatusSequence {
    job_id: String,
    audio_url: String,
    statuses: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .statuses
            .get(n)
            .or_else(|| self.statuses.last())
            .cloned()
            .unwrap_or_else(|| "queued".to_string());

        let audio_url = if status == "streaming" || status == "complete" {
            self.audio_url.clone()
        } else {
            String::new()
        };

        ResponseTemplate::new(200).set_body_json(json!([{
            "id": self.job_id,
            "status": status,
            "audio_url": audio_url,
            "title": "Generated",
            "model_name": "chirp-v3-5"
        }]))
    }
}

/// Mock music job API
pub struct MockSunoServer {
    server: MockServer,
    status_calls: Arc<AtomicUsize>,
}

impl MockSunoServer {
    /// Start a new mock music API
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            status_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Accept a generation request and return `job_id`
    pub async fn mock_generate_success(&self, job_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": job_id, "status": "submitted", "audio_url": ""}
            ])))
            .mount(&self.server)
            .await;
    }

    /// Reject generation requests
    pub async fn mock_generate_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(status_code).set_body_json(json!({"error": "rejected"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Script the status endpoint; the final state repeats once reached
    pub async fn mock_status_sequence(&self, job_id: &str, audio_url: &str, statuses: &[&str]) {
        let responder = StatusSequence {
            job_id: job_id.to_string(),
            audio_url: audio_url.to_string(),
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
            calls: Arc::clone(&self.status_calls),
        };

        Mock::given(method("GET"))
            .and(path("/api/get"))
            .respond_with(responder)
            .mount(&self.server)
            .await;
    }

    /// Return a quota document
    pub async fn mock_quota(&self, credits_left: i64) {
        Mock::given(method("GET"))
            .and(path("/api/get_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "credits_left": credits_left,
                "period": "day",
                "monthly_limit": 50,
                "monthly_usage": 50 - credits_left
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of status reads served
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Number of generation submissions received
    pub async fn generate_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/api/generate")
            .count()
    }
}
