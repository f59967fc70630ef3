use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Read-state routes mounted at `/sessions`.
///
/// ```text
/// DELETE /{session}                      -> forget_session
/// POST   /{session}/events/{id}/read     -> mark_read
/// POST   /{session}/read-all             -> mark_all_read
/// GET    /{session}/unread-count         -> unread_count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{session}", delete(sessions::forget_session))
        .route("/{session}/events/{id}/read", post(sessions::mark_read))
        .route("/{session}/read-all", post(sessions::mark_all_read))
        .route("/{session}/unread-count", get(sessions::unread_count))
}
