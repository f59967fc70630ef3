use std::sync::Arc;

use hazardwatch_engine::AlertService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The alert engine: store, read state, reviews and the synthetic feed.
    pub alerts: Arc<AlertService>,
}
