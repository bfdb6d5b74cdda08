//! Mock Supabase Storage for testing uploads
//!
//! Provides a [`MockStorageServer`] that accepts object uploads and lets
//! tests inspect what was written.

use serde_json::json;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const UPLOAD_PATH: &str = r"^/storage/v1/object/[^/]+/.+$";

/// Mock object store
pub struct MockStorageServer {
    server: MockServer,
}

impl MockStorageServer {
    /// Start a new mock storage server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Accept every upload
    pub async fn mock_upload_success(&self) {
        Mock::given(method("POST"))
            .and(path_regex(UPLOAD_PATH))
            .respond_with(|request: &Request| {
                let key = request
                    .url
                    .path()
                    .trim_start_matches("/storage/v1/object/")
                    .to_string();
                ResponseTemplate::new(200).set_body_json(json!({"Key": key}))
            })
            .mount(&self.server)
            .await;
    }

    /// Reject every upload
    pub async fn mock_upload_failure(&self, status_code: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path_regex(UPLOAD_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "statusCode": status_code.to_string(),
                "error": "Error",
                "message": message
            })))
            .mount(&self.server)
            .await;
    }

    /// All upload requests received so far
    pub async fn uploads(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.to_string() == "POST" && r.url.path().starts_with("/storage/v1/object/"))
            .collect()
    }

    /// Number of uploads received so far
    pub async fn upload_count(&self) -> usize {
        self.uploads().await.len()
    }

    /// Object paths (`<bucket>/<path>`) of uploads received so far
    pub async fn uploaded_keys(&self) -> Vec<String> {
        self.uploads()
            .await
            .iter()
            .map(|r| r.url.path().trim_start_matches("/storage/v1/object/").to_string())
            .collect()
    }
}
