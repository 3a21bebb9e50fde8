//! Router assembly: paths, CORS, and request tracing.

mod handlers;


use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the full HTTP surface, mounted under `/api`.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .route("/api/ask", post(handlers::ask))
        .route("/api/chat_sessions", get(handlers::list_sessions))
        .route("/api/chat_sessions/{id}", get(handlers::get_session))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured origins. `*` reflects the caller's
/// origin, since a literal wildcard cannot be combined with credentials.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(%origin, error = %e, "skipping unparsable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
