//! Request handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use lira_ai::SessionSummary;
use lira_common::{GatewayError, SessionId};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::protocol::{AskRequest, AskResponse, HealthResponse, SessionDetail};
use crate::state::AppState;

pub(super) async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.is_ready() {
        return Err(GatewayError::NotReady.into());
    }
    Ok(Json(HealthResponse {
        status: "healthy".into(),
        message: "Lira AI API is running".into(),
    }))
}

pub(super) async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AskResponse>, ApiError> {
    let request = AskRequest::from_body(&body)?;
    let query = request.validated_query()?;
    let assembler = state.assembler()?;

    info!(session_id = ?request.session_id(), "ask");

    let outcome = assembler.ask(query, request.session_id()).await?;
    if outcome.new_session_created {
        let sessions = state.store.len().await;
        info!(
            session_id = %outcome.session_id,
            sessions = sessions,
            "session opened"
        );
    }

    Ok(Json(AskResponse {
        response: outcome.response,
        session_id: outcome.session_id.to_string(),
        new_session_created: outcome.new_session_created,
    }))
}

pub(super) async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    let sessions = state.store.list().await;
    debug!(sessions = sessions.len(), "listing sessions");
    Json(sessions)
}

pub(super) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetail>, ApiError> {
    let session = state.store.get(&SessionId::from(id)).await?;
    Ok(Json(SessionDetail::from(&session)))
}
