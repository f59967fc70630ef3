//! Shared helpers for engine integration tests.

use std::time::Duration;

use hazardwatch_core::hazard::HazardReport;
use hazardwatch_engine::{AlertService, EngineConfig};
use serde_json::json;

/// Build a service with the feed stopped and a test prefix.
pub fn test_service() -> AlertService {
    AlertService::new(EngineConfig {
        feed_interval: Duration::from_secs(30),
        feed_probability: 1.0,
        feed_autostart: false,
        tracking_id_prefix: "HR".into(),
        notification_capacity: 64,
        seed_demo_events: false,
    })
}

/// A valid report; tweak the returned JSON before converting.
pub fn report_json(hazard_type: &str, severity: u8, (lat, lng): (f64, f64)) -> serde_json::Value {
    json!({
        "hazard_type": hazard_type,
        "severity": severity,
        "title": format!("{hazard_type} observed"),
        "description": "Water level rising rapidly near the shore.",
        "location": { "latitude": lat, "longitude": lng, "name": "Test site" },
        "reporter": { "name": "Field Observer", "email": "observer@example.org", "verified": true },
        "confidence": 80
    })
}

pub fn report(hazard_type: &str, severity: u8, coords: (f64, f64)) -> HazardReport {
    serde_json::from_value(report_json(hazard_type, severity, coords)).expect("valid report json")
}

pub const DWARKA: (f64, f64) = (22.2394, 68.9685);
pub const KOVALAM: (f64, f64) = (8.4004, 76.9787);
