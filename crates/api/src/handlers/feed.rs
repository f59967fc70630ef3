//! Handlers for the synthetic feed lifecycle.

use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hazardwatch_engine::FeedStatus;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional overrides for `POST /feed/start`; missing fields use the
/// configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct StartFeedRequest {
    pub interval_ms: Option<u64>,
    pub probability: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FeedChange {
    /// Whether this call changed the feed's state.
    pub changed: bool,
    pub status: FeedStatus,
}

/// GET /api/v1/feed
pub async fn feed_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let status = state.alerts.feed_status().await;

    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/feed/start
///
/// Idempotent: starting a running feed changes nothing.
pub async fn start_feed(
    State(state): State<AppState>,
    input: Option<Json<StartFeedRequest>>,
) -> AppResult<impl IntoResponse> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    let defaults = state.alerts.config();

    let interval = match input.interval_ms {
        Some(0) => return Err(AppError::BadRequest("interval_ms must be positive".into())),
        Some(ms) => Duration::from_millis(ms),
        None => defaults.feed_interval,
    };
    let probability = input.probability.unwrap_or(defaults.feed_probability);

    let changed = state.alerts.start_feed(interval, probability).await?;
    let status = state.alerts.feed_status().await;

    Ok(Json(DataResponse {
        data: FeedChange { changed, status },
    }))
}

/// POST /api/v1/feed/stop
///
/// Waits for an in-flight tick to finish. Idempotent.
pub async fn stop_feed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let changed = state.alerts.stop_feed().await;
    let status = state.alerts.feed_status().await;

    Ok(Json(DataResponse {
        data: FeedChange { changed, status },
    }))
}
