//! Chat trigger request types

use serde::Deserialize;

/// Chat model id that routes a request into the scenery pipeline
pub const PRIVATE_SCENERY_MODEL: &str = "private-scenery";

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Chat session id, used as the correlation id
    pub id: String,
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    pub selected_chat_model: String,
}

/// A chat message as sent by the client
///
/// `content` is usually a string but clients may send structured parts.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl ChatRequest {
    /// The last message authored by the user, if any
    pub fn most_recent_user_message(&self) -> Option<&IncomingMessage> {
        self.messages.iter().rev().find(|m| m.role == "user")
    }
}

impl IncomingMessage {
    /// Message content as text; structured content is JSON-serialised
    pub fn text(&self) -> String {
        match &self.content {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
