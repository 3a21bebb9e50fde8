//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod model;
mod server;


use crate::schema::GatewayConfig;
use lira_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    model::validate_model(&mut errors, config);
    server::validate_server(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
