use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upstream completion model settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier sent upstream.
    pub name: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Per-request timeout in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
    /// Completion length cap (valid range: 1-32768).
    pub max_tokens: u32,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Provider API key. Usually supplied through the environment.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Replaces the built-in instruction template when set.
    pub system_prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-4.1-nano-2025-04-14".into(),
            temperature: 0.7,
            request_timeout_secs: 30,
            max_tokens: 1024,
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
            system_prompt: None,
        }
    }
}

impl ModelConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}
