use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hazardwatch_api::config::ServerConfig;
use hazardwatch_api::router::build_app_router;
use hazardwatch_api::state::AppState;
use hazardwatch_engine::AlertService;
use hazardwatch_events::NotificationLogger;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hazardwatch_api=debug,hazardwatch_engine=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Alert engine ---
    let alerts = Arc::new(AlertService::new(config.engine.clone()));

    // Spawn the notification logger before anything can publish.
    let logger_handle = tokio::spawn(NotificationLogger::run(alerts.subscribe()));

    if config.engine.seed_demo_events {
        match alerts.seed_demo_events().await {
            Ok(count) => tracing::info!(count, "Demo events seeded"),
            Err(e) => tracing::error!(error = %e, "Failed to seed demo events"),
        }
    }

    if config.engine.feed_autostart {
        if let Err(e) = alerts.start_default_feed().await {
            tracing::error!(error = %e, "Failed to start synthetic feed");
        }
    }

    // --- App state ---
    let state = AppState {
        alerts: Arc::clone(&alerts),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    // Stop the feed first; an in-flight tick is allowed to finish.
    if tokio::time::timeout(grace, alerts.stop_feed()).await.is_err() {
        tracing::warn!("Synthetic feed did not stop within the shutdown timeout");
    }

    // Dropping the last service handle closes the bus, which ends the logger.
    drop(alerts);
    match tokio::time::timeout(grace, logger_handle).await {
        Ok(Ok(logged)) => tracing::info!(logged, "Notification logger stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "Notification logger task failed"),
        Err(_) => tracing::warn!("Notification logger did not stop within the shutdown timeout"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
