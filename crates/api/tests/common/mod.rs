#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use hazardwatch_api::config::ServerConfig;
use hazardwatch_api::router::build_app_router;
use hazardwatch_api::state::AppState;
use hazardwatch_engine::{AlertService, EngineConfig};

/// Build a test `ServerConfig` with safe defaults and the feed off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        engine: EngineConfig {
            feed_interval: Duration::from_secs(30),
            feed_probability: 0.10,
            feed_autostart: false,
            tracking_id_prefix: "HR".into(),
            notification_capacity: 64,
            seed_demo_events: false,
        },
    }
}

/// Build the full application router, returning the service so tests can
/// inspect engine state directly.
pub fn build_test_app() -> (Router, Arc<AlertService>) {
    let config = test_config();
    let alerts = Arc::new(AlertService::new(config.engine.clone()));
    let state = AppState {
        alerts: Arc::clone(&alerts),
    };
    (build_app_router(state, &config), alerts)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// A valid report body at the given coordinates.
pub fn report_body(hazard_type: &str, severity: u8, (lat, lng): (f64, f64)) -> Value {
    json!({
        "hazard_type": hazard_type,
        "severity": severity,
        "priority": "high",
        "title": "Massive waves approaching Dwarka coast",
        "description": "Water level rising rapidly.",
        "location": { "latitude": lat, "longitude": lng, "name": "Dwarka Beach, Gujarat" },
        "reporter": {
            "name": "Rajesh Patel",
            "phone": "+91 9876543210",
            "email": "rajesh.patel@gmail.com",
            "verified": true
        },
        "confidence": 85,
        "public_visibility": true
    })
}

/// Submit a report and return the created event JSON.
pub async fn create_event(
    app: &Router,
    hazard_type: &str,
    severity: u8,
    coords: (f64, f64),
) -> Value {
    let body = report_body(hazard_type, severity, coords);
    let response = post_json(app.clone(), "/api/v1/reports", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

pub const DWARKA: (f64, f64) = (22.2394, 68.9685);
pub const KOVALAM: (f64, f64) = (8.4004, 76.9787);
