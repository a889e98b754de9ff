//! HTTP-level integration tests for `POST /api/analyze-testimonial`.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_bytes, post_json};
use serde_json::json;

#[tokio::test]
async fn text_submission_returns_bare_feedback() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/analyze-testimonial",
        json!({ "text": "Short but sweet" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json.get("data").is_none(), "feedback is not enveloped");
    assert_eq!(json["sentiment"], "positive");
    assert_eq!(json["score"], 0.75);
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn media_submission_returns_feedback() {
    let app = common::build_test_app();
    let response =
        post_bytes(app, "/api/analyze-testimonial", "audio/webm", vec![0u8; 64]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sentiment"], "positive");
    assert!(json["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let app = common::build_test_app();
    let response = post_bytes(app, "/api/analyze-testimonial", "video/webm", vec![]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = common::build_test_app();
    let response = post_bytes(
        app,
        "/api/analyze-testimonial",
        "application/json",
        b"{\"words\": 1}".to_vec(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
