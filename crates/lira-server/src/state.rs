//! Shared application state handed to every handler.

use std::sync::Arc;

use lira_ai::{OpenAiClient, OpenAiConfig, PromptTemplate, SessionStore, TurnAssembler};
use lira_common::GatewayError;
use lira_config::ModelConfig;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    /// `None` when the model client could not be built at startup.
    assembler: Option<TurnAssembler>,
}

impl AppState {
    pub fn new(store: SessionStore, assembler: Option<TurnAssembler>) -> Self {
        Self { store, assembler }
    }

    /// Build the model client from config. Failure is logged and leaves the
    /// gateway running in the not-ready state.
    pub fn from_model_config(model: &ModelConfig) -> Self {
        let store = SessionStore::new();

        let client = match model.api_key.as_deref() {
            Some(key) => OpenAiClient::new(
                OpenAiConfig::new(key)
                    .with_model(&model.name)
                    .with_base_url(&model.base_url)
                    .with_temperature(model.temperature)
                    .with_max_tokens(model.max_tokens)
                    .with_request_timeout(model.request_timeout()),
            )
            .map_err(|e| e.to_string()),
            None => Err("no API key configured (set OPENAI_API_KEY)".to_string()),
        };

        let assembler = match client {
            Ok(client) => {
                info!(model = %model.name, "model client initialized");
                let template = model
                    .system_prompt
                    .clone()
                    .map(PromptTemplate::new)
                    .unwrap_or_default();
                Some(TurnAssembler::new(store.clone(), Arc::new(client)).with_template(template))
            }
            Err(reason) => {
                error!(model = %model.name, %reason, "failed to initialize model client");
                None
            }
        };

        Self::new(store, assembler)
    }

    pub fn is_ready(&self) -> bool {
        self.assembler.is_some()
    }

    pub fn assembler(&self) -> Result<&TurnAssembler, GatewayError> {
        self.assembler.as_ref().ok_or(GatewayError::NotReady)
    }
}
