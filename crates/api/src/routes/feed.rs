use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feed;
use crate::state::AppState;

/// Synthetic feed lifecycle routes mounted at `/feed`.
///
/// ```text
/// GET  /        -> feed_status
/// POST /start   -> start_feed
/// POST /stop    -> stop_feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed::feed_status))
        .route("/start", post(feed::start_feed))
        .route("/stop", post(feed::stop_feed))
}
