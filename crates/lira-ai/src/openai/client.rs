//! Chat-completions client struct, request building, and response parsing.

use std::time::Duration;

use crate::{AiError, AiResponse, Message, TokenUsage};

use super::config::OpenAiConfig;

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    /// Build the client. Fails when the key is blank or the HTTP stack cannot
    /// be initialized; callers treat either as "model not ready".
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::ApiError("API key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Build the JSON request body for the chat-completions endpoint.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        })
    }

    /// Parse a non-streaming response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let choice = json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or_else(|| AiError::ParseError("no choices in response".to_string()))?;

        let content = choice["message"]["content"]
            .as_str()
            .ok_or_else(|| AiError::ParseError("choice has no text content".to_string()))?
            .to_string();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse { content, usage })
    }
}
