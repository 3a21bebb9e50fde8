//! Mapping of gateway failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lira_common::GatewayError;
use serde_json::error::Category;

use crate::protocol::ErrorBody;

/// An error on its way out to the client as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            GatewayError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::ModelInvocation(_) | GatewayError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

/// Request bodies that fail to decode. Broken JSON is a 400, JSON of the
/// wrong shape a 422.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        let status = match err.classify() {
            Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
            Category::Syntax | Category::Eof | Category::Io => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            detail: format!("Invalid request body: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { detail: self.detail })).into_response()
    }
}
