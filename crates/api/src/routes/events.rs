use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Event query and review routes mounted at `/events`.
///
/// ```text
/// GET  /              -> list_events
/// GET  /summary       -> event_summary
/// GET  /{id}          -> get_event
/// POST /{id}/review   -> review_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events))
        .route("/summary", get(events::event_summary))
        .route("/{id}", get(events::get_event))
        .route("/{id}/review", post(events::review_event))
}
