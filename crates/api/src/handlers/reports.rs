//! Handler for hazard report submission.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hazardwatch_core::hazard::HazardReport;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reports
///
/// Validate a report and store it as a new `pending` event.
pub async fn submit_report(
    State(state): State<AppState>,
    Json(input): Json<HazardReport>,
) -> AppResult<impl IntoResponse> {
    let event = state.alerts.submit_report(input).await?;

    tracing::info!(
        event_id = %event.id,
        tracking_id = %event.tracking_id,
        hazard_type = %event.hazard_type,
        severity = event.severity.get(),
        "Hazard report submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}
