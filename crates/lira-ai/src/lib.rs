//! Model access and conversation state for the Lira gateway.
//!
//! Provides:
//! - the `AiClient` seam and an OpenAI-compatible chat-completions client
//! - the instruction template that frames every model call
//! - the in-process session store and the turn assembler that drives a
//!   question through history, model, and back into the store

pub mod openai;
pub mod prompt;
pub mod session;

use async_trait::async_trait;
use lira_common::GatewayError;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::PromptTemplate;
pub use session::{AskOutcome, Session, SessionStore, SessionSummary, Speaker, Turn, TurnAssembler};

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<AiError> for GatewayError {
    fn from(err: AiError) -> Self {
        GatewayError::ModelInvocation(err.to_string())
    }
}
