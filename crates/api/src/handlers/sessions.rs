//! Handlers for per-session read state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hazardwatch_core::types::EventId;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: usize,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub session: String,
    pub unread: usize,
}

/// POST /api/v1/sessions/{session}/events/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, EventId)>,
) -> AppResult<impl IntoResponse> {
    state.alerts.mark_read(&session, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/{session}/read-all
///
/// Mark every event stored at call time as read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> AppResult<impl IntoResponse> {
    let marked = state.alerts.mark_all_read(&session).await;

    Ok(Json(DataResponse {
        data: MarkAllReadResponse { marked },
    }))
}

/// GET /api/v1/sessions/{session}/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> AppResult<impl IntoResponse> {
    let unread = state.alerts.unread_count(&session).await;

    Ok(Json(DataResponse {
        data: UnreadCountResponse { session, unread },
    }))
}

/// DELETE /api/v1/sessions/{session}
///
/// Drop the session's read state. Idempotent.
pub async fn forget_session(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.alerts.forget_session(&session).await;

    Ok(StatusCode::NO_CONTENT)
}
