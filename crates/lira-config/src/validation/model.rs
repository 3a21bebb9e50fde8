//! Validation for the `[model]` section.

use crate::schema::GatewayConfig;

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

pub(crate) fn validate_model(errors: &mut Vec<String>, config: &GatewayConfig) {
    let model = &config.model;
    validate_not_blank(errors, "model.name", &model.name);
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs,
        1,
        600,
    );
    validate_range(errors, "model.max_tokens", model.max_tokens, 1, 32_768);

    if !(model.base_url.starts_with("http://") || model.base_url.starts_with("https://")) {
        errors.push(format!(
            "model.base_url = {} must start with http:// or https://",
            model.base_url
        ));
    }
}
