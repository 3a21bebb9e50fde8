//! Environment variable overrides.
//!
//! Applied on top of the file layer. `LIRA_API_KEY` wins over the
//! provider-conventional `OPENAI_API_KEY`.

use std::str::FromStr;

use lira_common::ConfigError;
use tracing::debug;

use crate::schema::{GatewayConfig, LogLevel};

/// Apply overrides from an arbitrary key lookup. Blank values are ignored.
pub fn apply_overrides_from<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("LIRA_MODEL") {
        config.model.name = v;
    }
    if let Some(v) = get("LIRA_TEMPERATURE") {
        config.model.temperature = parse_value("LIRA_TEMPERATURE", &v)?;
    }
    if let Some(v) = get("LIRA_REQUEST_TIMEOUT") {
        config.model.request_timeout_secs = parse_value("LIRA_REQUEST_TIMEOUT", &v)?;
    }
    if let Some(v) = get("LIRA_MAX_TOKENS") {
        config.model.max_tokens = parse_value("LIRA_MAX_TOKENS", &v)?;
    }
    if let Some(v) = get("LIRA_BASE_URL") {
        config.model.base_url = v;
    }
    if let Some(v) = get("LIRA_SYSTEM_PROMPT") {
        config.model.system_prompt = Some(v);
    }
    if let Some(v) = get("LIRA_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
        config.model.api_key = Some(v);
    }

    if let Some(v) = get("LIRA_HOST") {
        config.server.host = v;
    }
    if let Some(v) = get("LIRA_PORT") {
        config.server.port = parse_value("LIRA_PORT", &v)?;
    }
    if let Some(v) = get("LIRA_ALLOWED_ORIGINS") {
        config.server.allowed_origins = split_origins(&v);
    }

    if let Some(v) = get("LIRA_LOG_LEVEL") {
        config.logging.level = LogLevel::parse(&v)
            .ok_or_else(|| ConfigError::ParseError(format!("LIRA_LOG_LEVEL: unknown level '{v}'")))?;
    }

    debug!(model = %config.model.name, "environment overrides applied");
    Ok(())
}

/// Split a comma-separated origin list, dropping empty entries.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::ParseError(format!("{key}: invalid value '{raw}': {e}")))
}
