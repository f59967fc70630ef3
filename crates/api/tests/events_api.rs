//! Integration tests for event queries and review.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_event, get, post_json, DWARKA, KOVALAM};
use serde_json::{json, Value};

fn ids(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_newest_first_and_unread() {
    let (app, _) = common::build_test_app();
    let first = create_event(&app, "flooding", 2, KOVALAM).await;
    let second = create_event(&app, "flooding", 2, KOVALAM).await;

    let response = get(app, "/api/v1/events?session=s1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(ids(&json), vec![second["id"].as_str().unwrap(), first["id"].as_str().unwrap()]);
    assert!(json["data"].as_array().unwrap().iter().all(|e| e["is_read"] == false));
    assert_eq!(json["data"][0]["status"], "pending");
}

#[tokio::test]
async fn list_filters_by_severity_and_type() {
    let (app, _) = common::build_test_app();
    create_event(&app, "tsunami", 2, DWARKA).await;
    let wanted = create_event(&app, "tsunami", 5, DWARKA).await;
    create_event(&app, "flooding", 4, DWARKA).await;

    let json = body_json(get(app, "/api/v1/events?severity=4,5&hazard_type=tsunami").await).await;
    assert_eq!(ids(&json), vec![wanted["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn list_filters_by_bounding_box() {
    let (app, _) = common::build_test_app();
    let dwarka = create_event(&app, "tsunami", 5, DWARKA).await;

    let gujarat = body_json(
        get(app.clone(), "/api/v1/events?min_lat=20&max_lat=24.7&min_lng=68&max_lng=74.5").await,
    )
    .await;
    assert_eq!(ids(&gujarat), vec![dwarka["id"].as_str().unwrap()]);

    let kerala = body_json(
        get(app, "/api/v1/events?min_lat=8&max_lat=12.8&min_lng=74.8&max_lng=77.5").await,
    )
    .await;
    assert!(ids(&kerala).is_empty());
}

#[tokio::test]
async fn list_rejects_unknown_status() {
    let (app, _) = common::build_test_app();
    let response = get(app, "/api/v1/events?status=approved").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ENUM");
}

#[tokio::test]
async fn list_paginates() {
    let (app, _) = common::build_test_app();
    for _ in 0..4 {
        create_event(&app, "erosion", 3, KOVALAM).await;
    }

    let json = body_json(get(app, "/api/v1/events?limit=2&offset=1").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn summary_counts_by_dimension() {
    let (app, _) = common::build_test_app();
    create_event(&app, "tsunami", 5, DWARKA).await;
    create_event(&app, "flooding", 2, KOVALAM).await;

    let json = body_json(get(app, "/api/v1/events/summary").await).await;
    let summary = &json["data"];
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["critical_open"], 1);
    assert_eq!(summary["by_hazard_type"]["tsunami"], 1);
    assert_eq!(summary["by_status"]["pending"], 2);
}

// ---------------------------------------------------------------------------
// Test: get by id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_event_by_id() {
    let (app, _) = common::build_test_app();
    let event = create_event(&app, "high-waves", 3, KOVALAM).await;
    let id = event["id"].as_str().unwrap();

    let response = get(app, &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["tracking_id"], event["tracking_id"]);
}

#[tokio::test]
async fn get_unknown_event_returns_404() {
    let (app, _) = common::build_test_app();
    let response = get(app, &format!("/api/v1/events/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: review workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verify_then_second_review_conflicts() {
    let (app, _) = common::build_test_app();
    let event = create_event(&app, "storm-surge", 4, DWARKA).await;
    let uri = format!("/api/v1/events/{}/review", event["id"].as_str().unwrap());

    let response = post_json(
        app.clone(),
        &uri,
        json!({
            "action": "verify",
            "reviewer": "Dr. A. Sharma",
            "notes": "Verified by Coast Guard."
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviewed = body_json(response).await;
    assert_eq!(reviewed["data"]["status"], "verified");
    assert_eq!(reviewed["data"]["reviewed_by"], "Dr. A. Sharma");
    assert_eq!(reviewed["data"]["review_notes"], "Verified by Coast Guard.");
    assert!(reviewed["data"]["reviewed_at"].is_string());

    let again = post_json(app, &uri, json!({ "action": "reject", "reviewer": "Someone" })).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "ILLEGAL_TRANSITION");
}

#[tokio::test]
async fn begin_review_then_mark_false_alarm() {
    let (app, _) = common::build_test_app();
    let event = create_event(&app, "flooding", 2, KOVALAM).await;
    let uri = format!("/api/v1/events/{}/review", event["id"].as_str().unwrap());

    let begin = json!({ "action": "begin-review", "reviewer": "City Official" });
    let started = body_json(post_json(app.clone(), &uri, begin).await).await;
    assert_eq!(started["data"]["status"], "under-review");
    assert!(started["data"].get("reviewed_at").is_none());

    let close = json!({ "action": "mark-false-alarm", "reviewer": "City Official" });
    let closed = body_json(post_json(app, &uri, close).await).await;
    assert_eq!(closed["data"]["status"], "false-alarm");
}

#[tokio::test]
async fn review_without_reviewer_returns_400() {
    let (app, _) = common::build_test_app();
    let event = create_event(&app, "tsunami", 5, DWARKA).await;
    let uri = format!("/api/v1/events/{}/review", event["id"].as_str().unwrap());

    let response = post_json(app, &uri, json!({ "action": "verify" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_review_action_returns_400() {
    let (app, _) = common::build_test_app();
    let event = create_event(&app, "tsunami", 5, DWARKA).await;
    let uri = format!("/api/v1/events/{}/review", event["id"].as_str().unwrap());

    let response = post_json(app, &uri, json!({ "action": "approve", "reviewer": "x" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ENUM");
}

#[tokio::test]
async fn review_unknown_event_returns_404() {
    let (app, _) = common::build_test_app();
    let uri = format!("/api/v1/events/{}/review", uuid::Uuid::new_v4());

    let response = post_json(app, &uri, json!({ "action": "verify", "reviewer": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
