//! HTTP request and response bodies.

use lira_ai::{Session, Speaker};
use lira_common::GatewayError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl AskRequest {
    /// Decode a request body. The Content-Type header is not consulted.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// The query, if present and not blank.
    pub fn validated_query(&self) -> Result<&str, GatewayError> {
        match self.query.as_deref() {
            Some(q) if !q.trim().is_empty() => Ok(q),
            _ => Err(GatewayError::InvalidInput("query must not be empty".into())),
        }
    }

    /// The session id, treating an empty string as absent.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
    pub session_id: String,
    pub new_session_created: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Message author as the web client names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Human,
    Ai,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

impl From<&Session> for SessionDetail {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            title: session.title().to_string(),
            messages: session
                .turns()
                .iter()
                .map(|turn| ChatMessage {
                    kind: match turn.speaker() {
                        Speaker::User => MessageKind::Human,
                        Speaker::Assistant => MessageKind::Ai,
                    },
                    content: turn.text().to_string(),
                })
                .collect(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
