//! Handlers for querying and reviewing hazard events.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use hazardwatch_core::review::ReviewAction;
use hazardwatch_core::types::EventId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::query::EventListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a review request.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// `begin-review`, `verify`, `reject` or `mark-false-alarm`.
    pub action: String,
    #[serde(default)]
    pub reviewer: String,
    pub notes: Option<String>,
}

/// GET /api/v1/events
///
/// Filtered, newest-first events, annotated with the session's read flags.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query()?;
    let rows = state.alerts.query_events(&query).await?;

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/events/summary
///
/// Dashboard totals over the events matching the same filters as the list.
pub async fn event_summary(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.to_filter()?;
    let summary = state.alerts.summary(&filter).await?;

    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> AppResult<impl IntoResponse> {
    let event = state.alerts.get_event(id).await?;

    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events/{id}/review
///
/// Apply a reviewer action. Leaving a terminal state is a 409.
pub async fn review_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let action: ReviewAction = input.action.parse()?;
    let event = state
        .alerts
        .review_event(id, action, &input.reviewer, input.notes)
        .await?;

    Ok(Json(DataResponse { data: event }))
}
