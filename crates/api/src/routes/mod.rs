pub mod events;
pub mod feed;
pub mod health;
pub mod reports;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reports                                         submit report (POST)
///
/// /events                                          list (GET)
/// /events/summary                                  dashboard totals (GET)
/// /events/{id}                                     get (GET)
/// /events/{id}/review                              review action (POST)
///
/// /sessions/{session}                              forget read state (DELETE)
/// /sessions/{session}/events/{id}/read             mark read (POST)
/// /sessions/{session}/read-all                     mark all read (POST)
/// /sessions/{session}/unread-count                 unread count (GET)
///
/// /feed                                            status (GET)
/// /feed/start                                      start synthetic feed (POST)
/// /feed/stop                                       stop synthetic feed (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router())
        .nest("/events", events::router())
        .nest("/sessions", sessions::router())
        .nest("/feed", feed::router())
}
