//! OpenAI-compatible chat-completions client.
//!
//! Implements the `AiClient` trait against `POST {base_url}/chat/completions`
//! with bearer-token authentication. Any provider exposing the same surface
//! can be targeted by changing the base URL.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
