//! HTTP-level integration tests for the collection wizard endpoints.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use cenphi_core::collection::SubmissionBody;
use cenphi_events::names;
use common::{body_json, delete, get, post_bytes, post_empty, post_json, StubSubmitter};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Start a session and return its id.
async fn start_session(app: axum::Router) -> String {
    let response = post_empty(app, "/api/v1/collection/sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["session_id"].as_str().unwrap().to_string()
}

fn session_uri(id: &str, suffix: &str) -> String {
    format!("/api/v1/collection/sessions/{id}{suffix}")
}

// ---------------------------------------------------------------------------
// Catalog and session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prompt_catalog_is_listed_in_order() {
    let app = common::build_test_app();
    let json = body_json(get(app, "/api/v1/collection/prompts").await).await;

    let prompts = json["data"].as_array().unwrap();
    assert_eq!(prompts.len(), 5);
    assert_eq!(prompts[0]["id"], "intro");
    assert_eq!(prompts[4]["id"], "recommendation");
}

#[tokio::test]
async fn new_session_starts_on_first_prompt() {
    let app = common::build_test_app();
    let response = post_empty(app, "/api/v1/collection/sessions").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["session_id"].as_str().unwrap().len(), 7);
    assert_eq!(data["state"]["type"], serde_json::Value::Null);
    assert_eq!(data["state"]["current_prompt_index"], 0);
    assert_eq!(data["current_prompt"]["id"], "intro");
    assert_eq!(data["total_prompts"], 5);
    assert_eq!(data["progress"], 0.2);
    assert_eq!(data["is_complete"], false);
    assert_eq!(data["buffer"]["kind"], "empty");
}

#[tokio::test]
async fn unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = get(app, &session_uri("zzzzzzz", "")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let response = delete(app.clone(), &session_uri(&id, "")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &session_uri(&id, "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Type selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn media_type_opens_options_modal_until_option_chosen() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let json = body_json(
        post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "video" }))
            .await,
    )
    .await;
    assert_eq!(json["data"]["state"]["type"], "video");
    assert_eq!(json["data"]["show_options_modal"], true);

    let json = body_json(
        post_json(
            app.clone(),
            &session_uri(&id, "/option"),
            serde_json::json!({ "option": "upload" }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["selected_option"], "upload");
    assert_eq!(json["data"]["show_options_modal"], false);

    let json = body_json(post_empty(app, &session_uri(&id, "/change-type")).await).await;
    assert_eq!(json["data"]["state"]["type"], serde_json::Value::Null);
    assert_eq!(json["data"]["selected_option"], serde_json::Value::Null);
}

#[tokio::test]
async fn text_type_skips_options_modal() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let json = body_json(
        post_json(app, &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await,
    )
    .await;
    assert_eq!(json["data"]["state"]["type"], "text");
    assert_eq!(json["data"]["show_options_modal"], false);
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let response =
        post_json(app, &session_uri(&id, "/type"), serde_json::json!({ "type": "gif" })).await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn next_advances_until_final_prompt() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    for i in 1..5 {
        let json = body_json(post_empty(app.clone(), &session_uri(&id, "/next")).await).await;
        assert_eq!(json["data"]["advanced"], true);
        assert_eq!(json["data"]["session"]["state"]["current_prompt_index"], i);
        assert_eq!(json["data"]["session"]["progress"], (i + 1) as f64 / 5.0);
    }

    let json = body_json(post_empty(app, &session_uri(&id, "/next")).await).await;
    assert_eq!(json["data"]["advanced"], false);
    assert_eq!(json["data"]["session"]["state"]["current_prompt_index"], 4);
    assert_eq!(json["data"]["session"]["is_complete"], true);
    assert_eq!(json["data"]["session"]["current_prompt"]["id"], "recommendation");
}

// ---------------------------------------------------------------------------
// Captured content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recording_controls_accumulate_duration() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let json = body_json(post_empty(app.clone(), &session_uri(&id, "/recording/start")).await).await;
    assert_eq!(json["data"]["state"]["is_recording"], true);

    let json = body_json(post_empty(app.clone(), &session_uri(&id, "/recording/pause")).await).await;
    assert_eq!(json["data"]["state"]["is_paused"], true);

    post_empty(app.clone(), &session_uri(&id, "/recording/resume")).await;
    let json = body_json(
        post_empty(app, &session_uri(&id, "/recording/stop?elapsed_secs=12.5")).await,
    )
    .await;
    assert_eq!(json["data"]["state"]["is_recording"], false);
    assert_eq!(json["data"]["state"]["duration"], 12.5);
}

#[tokio::test]
async fn invalid_recording_action_is_rejected() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    let response = post_empty(app, &session_uri(&id, "/recording/rewind")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn segments_require_a_media_type() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    // No type selected yet.
    let response =
        post_bytes(app.clone(), &session_uri(&id, "/segments"), "audio/webm", vec![1, 2]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;
    let response = post_bytes(app, &session_uri(&id, "/segments"), "audio/webm", vec![1, 2]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn empty_segment_is_rejected() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;
    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "audio" })).await;

    let response = post_bytes(app, &session_uri(&id, "/segments"), "audio/webm", vec![]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn text_is_rejected_for_media_sessions() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;

    // No type selected yet.
    let response =
        post_json(app.clone(), &session_uri(&id, "/text"), serde_json::json!({ "text": "early" }))
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "audio" })).await;
    post_bytes(app.clone(), &session_uri(&id, "/segments"), "audio/webm", vec![7; 4]).await;

    let response =
        post_json(app.clone(), &session_uri(&id, "/text"), serde_json::json!({ "text": "late" }))
            .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let json = body_json(get(app, &session_uri(&id, "")).await).await;
    assert_eq!(json["data"]["buffer"]["kind"], "segments");
    assert_eq!(json["data"]["buffer"]["count"], 1);
}

#[tokio::test]
async fn text_is_rejected_once_segments_are_held() {
    let app = common::build_test_app();
    let id = start_session(app.clone()).await;
    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "video" })).await;
    post_bytes(app.clone(), &session_uri(&id, "/segments"), "video/webm", vec![1; 4]).await;

    post_empty(app.clone(), &session_uri(&id, "/change-type")).await;
    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;

    let response =
        post_json(app, &session_uri(&id, "/text"), serde_json::json!({ "text": "switched" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("recorded media"));
}

#[tokio::test]
async fn segment_after_written_answer_is_rejected() {
    let state = common::test_state(Arc::new(StubSubmitter::ok()));
    let mut events = state.event_bus.subscribe();
    let app = common::build_test_app_with(state);
    let id = start_session(app.clone()).await;

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;
    post_json(app.clone(), &session_uri(&id, "/text"), serde_json::json!({ "text": "Great" })).await;
    post_empty(app.clone(), &session_uri(&id, "/change-type")).await;
    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "video" })).await;

    let response =
        post_bytes(app.clone(), &session_uri(&id, "/segments"), "video/webm", vec![1; 8]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let json = body_json(get(app, &session_uri(&id, "")).await).await;
    assert_eq!(json["data"]["buffer"]["kind"], "text");

    let mut segment_events = 0;
    while let Ok(event) = events.try_recv() {
        if event.event_type == names::COLLECTION_SEGMENT_ADDED {
            segment_events += 1;
        }
    }
    assert_eq!(segment_events, 0);
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_video_flow_submits_concatenated_segments() {
    let submitter = Arc::new(StubSubmitter::ok());
    let state = common::test_state(Arc::clone(&submitter));
    let mut events = state.event_bus.subscribe();
    let app = common::build_test_app_with(state);
    let id = start_session(app.clone()).await;

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "video" })).await;
    post_json(
        app.clone(),
        &session_uri(&id, "/option"),
        serde_json::json!({ "option": "record" }),
    )
    .await;

    for chunk in [vec![1u8, 2], vec![3u8]] {
        let response =
            post_bytes(app.clone(), &session_uri(&id, "/segments"), "video/webm", chunk).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    for _ in 0..4 {
        post_empty(app.clone(), &session_uri(&id, "/next")).await;
    }

    let response = post_empty(app, &session_uri(&id, "/complete")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["data"]["report"]["outcome"], "sent");
    assert_eq!(json["data"]["report"]["status"], 200);
    assert_eq!(json["data"]["report"]["feedback_recorded"], true);
    assert_eq!(json["data"]["session"]["state"]["feedback"]["sentiment"], "positive");

    let seen = submitter.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        SubmissionBody::Binary {
            mime_type: "video/webm".into(),
            data: vec![1, 2, 3],
        }
    );
    drop(seen);

    let mut event_types = Vec::new();
    while let Ok(event) = events.try_recv() {
        event_types.push(event.event_type);
    }
    assert_eq!(event_types.first().map(String::as_str), Some(names::COLLECTION_STARTED));
    assert_eq!(event_types.last().map(String::as_str), Some(names::COLLECTION_SUBMITTED));
    assert_eq!(
        event_types
            .iter()
            .filter(|t| *t == names::COLLECTION_PROMPT_ADVANCED)
            .count(),
        4
    );
}

#[tokio::test]
async fn text_flow_submits_json_body() {
    let submitter = Arc::new(StubSubmitter::ok());
    let app = common::build_test_app_with(common::test_state(Arc::clone(&submitter)));
    let id = start_session(app.clone()).await;

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;
    let json = body_json(
        post_json(
            app.clone(),
            &session_uri(&id, "/text"),
            serde_json::json!({ "text": "Support answered within minutes." }),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["buffer"]["kind"], "text");

    let json = body_json(post_empty(app, &session_uri(&id, "/complete")).await).await;
    assert_eq!(json["data"]["report"]["outcome"], "sent");

    let seen = submitter.seen.lock().unwrap();
    assert_matches!(&seen[0], SubmissionBody::Json(v) if v["text"] == "Support answered within minutes.");
}

#[tokio::test]
async fn completing_without_content_is_skipped() {
    let submitter = Arc::new(StubSubmitter::ok());
    let app = common::build_test_app_with(common::test_state(Arc::clone(&submitter)));
    let id = start_session(app.clone()).await;

    let json = body_json(post_empty(app, &session_uri(&id, "/complete")).await).await;
    assert_eq!(json["data"]["report"]["outcome"], "skipped");
    assert!(submitter.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submission_failure_is_reported_not_raised() {
    let submitter = Arc::new(StubSubmitter::failing(503));
    let app = common::build_test_app_with(common::test_state(Arc::clone(&submitter)));
    let id = start_session(app.clone()).await;

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;
    post_json(app.clone(), &session_uri(&id, "/text"), serde_json::json!({ "text": "Great" })).await;

    let response = post_empty(app, &session_uri(&id, "/complete")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["report"]["outcome"], "failed");
    assert_eq!(json["data"]["session"]["state"]["feedback"], serde_json::Value::Null);
}

#[tokio::test]
async fn delivered_sessions_are_dropped() {
    let state = common::test_state(Arc::new(StubSubmitter::ok()));
    let sessions = Arc::clone(&state.sessions);
    let app = common::build_test_app_with(state);

    for _ in 0..5 {
        let id = start_session(app.clone()).await;
        post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "audio" }))
            .await;
        post_bytes(app.clone(), &session_uri(&id, "/segments"), "audio/webm", vec![3; 16]).await;

        let json = body_json(post_empty(app.clone(), &session_uri(&id, "/complete")).await).await;
        assert_eq!(json["data"]["report"]["outcome"], "sent");

        let response = get(app.clone(), &session_uri(&id, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    assert_eq!(sessions.len().await, 0);
}

#[tokio::test]
async fn failed_sessions_are_kept_for_another_attempt() {
    let state = common::test_state(Arc::new(StubSubmitter::failing(502)));
    let sessions = Arc::clone(&state.sessions);
    let app = common::build_test_app_with(state);
    let id = start_session(app.clone()).await;

    post_json(app.clone(), &session_uri(&id, "/type"), serde_json::json!({ "type": "text" })).await;
    post_json(app.clone(), &session_uri(&id, "/text"), serde_json::json!({ "text": "Great" })).await;
    post_empty(app.clone(), &session_uri(&id, "/complete")).await;

    assert_eq!(sessions.len().await, 1);
    let response = get(app, &session_uri(&id, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
