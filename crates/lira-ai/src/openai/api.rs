//! AiClient trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiClient, AiError, AiResponse, Message};

use super::client::OpenAiClient;

#[async_trait]
impl AiClient for OpenAiClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(messages);

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "chat completions request"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::ParseError(e.to_string())
            }
        })?;

        let parsed = self.parse_response(json)?;
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            total_tokens = parsed.usage.total_tokens(),
            "chat completions response"
        );
        Ok(parsed)
    }
}

fn map_transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}
