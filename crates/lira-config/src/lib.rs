//! Lira gateway configuration.
//!
//! Layered resolution: built-in defaults, then an optional TOML file, then
//! environment variables. Every section uses serde defaults so partial files
//! work out of the box. The result is validated as a whole.

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::apply_overrides_from;
pub use schema::{GatewayConfig, LogLevel, LoggingConfig, ModelConfig, ServerConfig};

use std::path::Path;

use lira_common::ConfigError;

/// Load the effective configuration.
///
/// `explicit` is the path given on the command line or through `LIRA_CONFIG`.
pub fn load_config(explicit: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config_with(explicit, |key| std::env::var(key).ok())
}

/// [`load_config`] with environment lookups routed through `lookup`.
pub fn load_config_with<F>(explicit: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = toml_loader::load_layered_file(explicit)?;
    apply_overrides_from(&mut config, lookup)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string. The API key is never
/// included.
pub fn config_to_json(config: &GatewayConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
