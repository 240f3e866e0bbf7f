//! Chat endpoints.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::http_client::HttpClient;
use super::transport::Transport;
use crate::state::notices::Notifier;

pub const MESSAGES_PATH: &str = "/api/chat/messages";
pub const SEND_PATH: &str = "/api/chat/send";

/// A chat message as served by `/api/chat/messages`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "isSent", default)]
    pub is_sent: bool,
}

/// A missing or null `text` renders as an empty row instead of failing the
/// whole history.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    message: &'a str,
    target_user_id: Option<&'a str>,
}

/// Server reply to a send. Unknown fields are preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SendResult {
    /// False only when the server explicitly reports `success: false`.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.success != Some(false)
    }
}

#[derive(Clone, Debug)]
pub struct ChatClient<T, N> {
    http: HttpClient<T, N>,
}

impl<T: Transport, N: Notifier> ChatClient<T, N> {
    pub fn new(http: HttpClient<T, N>) -> Self {
        Self { http }
    }

    /// Message history. Empty on failure.
    pub async fn load_messages(&self) -> Vec<ChatMessage> {
        match self.http.get(MESSAGES_PATH).await {
            Ok(messages) => messages,
            Err(err) => {
                leptos::logging::error!("error loading messages: {err}");
                Vec::new()
            }
        }
    }

    /// Send `text`, optionally to one user. `None` on failure.
    pub async fn send_message(&self, text: &str, target_user_id: Option<&str>) -> Option<SendResult> {
        let body = SendMessageBody { message: text, target_user_id };
        match self.http.post(SEND_PATH, &body).await {
            Ok(result) => Some(result),
            Err(err) => {
                leptos::logging::error!("error sending message: {err}");
                None
            }
        }
    }
}
