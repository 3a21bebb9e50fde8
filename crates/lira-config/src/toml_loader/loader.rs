//! Core TOML config loading: read from an explicit path or the platform default.

use crate::schema::GatewayConfig;
use lira_common::ConfigError;
use std::path::Path;
use tracing::{debug, info};

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. Validation is left to the caller
/// because environment overrides are applied on top of the file first.
pub fn load_from_path(path: &Path) -> Result<GatewayConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: GatewayConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Resolve the file layer of the configuration.
///
/// An explicit path must exist. Without one, the platform default path is
/// used when present, and built-in defaults otherwise.
pub fn load_layered_file(explicit: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    match default_config_path() {
        Ok(path) if path.exists() => load_from_path(&path),
        Ok(path) => {
            debug!("no config file at {}, using defaults", path.display());
            Ok(GatewayConfig::default())
        }
        Err(e) => {
            debug!("{e}, using defaults");
            Ok(GatewayConfig::default())
        }
    }
}
