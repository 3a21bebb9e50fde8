//! Validation for the `[server]` section.

use crate::schema::GatewayConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &GatewayConfig) {
    let server = &config.server;
    validate_not_blank(errors, "server.host", &server.host);
    validate_range(errors, "server.port", server.port, 1, 65_535);

    for origin in &server.allowed_origins {
        if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(format!(
                "server.allowed_origins entry '{origin}' must be an http(s) origin or '*'"
            ));
        }
    }
}
