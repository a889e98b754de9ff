#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use cenphi_api::auth::jwt::{generate_access_token, JwtConfig};
use cenphi_api::config::ServerConfig;
use cenphi_api::router::build_app_router;
use cenphi_api::sessions::SessionRegistry;
use cenphi_api::state::AppState;
use cenphi_core::analysis::CannedAnalysis;
use cenphi_core::collection::{
    SubmissionBody, SubmissionResponse, SubmitError, TestimonialSubmitter,
};
use cenphi_core::moderation::TestimonialBoard;
use cenphi_events::{EventBus, EventLog};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the widget fixtures under `tests/`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        widget_assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/widget").into(),
        public_base_url: "https://app.cenphi.test".to_string(),
        analysis_delay_ms: 0,
        submission_url: "http://127.0.0.1:0/api/analyze-testimonial".to_string(),
        submission_timeout_secs: 20,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Submitter that records every body and answers with a fixed response.
pub struct StubSubmitter {
    pub seen: Mutex<Vec<SubmissionBody>>,
    pub status: u16,
    pub body: String,
}

impl StubSubmitter {
    pub fn ok() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            status: 200,
            body: serde_json::json!({
                "score": 0.8,
                "sentiment": "positive",
                "suggestions": [],
                "highlights": ["Great onboarding"],
            })
            .to_string(),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            status,
            body: "upstream unavailable".to_string(),
        }
    }
}

#[async_trait]
impl TestimonialSubmitter for StubSubmitter {
    async fn submit(&self, body: SubmissionBody) -> Result<SubmissionResponse, SubmitError> {
        self.seen.lock().unwrap().push(body);
        if (200..300).contains(&self.status) {
            Ok(SubmissionResponse {
                status: self.status,
                body: self.body.clone(),
            })
        } else {
            Err(SubmitError::Status {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}

/// Build application state around the given submitter, with no analysis
/// delay.
pub fn test_state(submitter: Arc<StubSubmitter>) -> AppState {
    let config = test_config();
    AppState {
        config: Arc::new(config),
        sessions: Arc::new(SessionRegistry::new()),
        board: Arc::new(RwLock::new(TestimonialBoard::new())),
        analysis: Arc::new(CannedAnalysis::new(Duration::ZERO)),
        submitter,
        event_bus: Arc::new(EventBus::default()),
        event_log: Arc::new(EventLog::default()),
    }
}

/// Build the full application router with a succeeding stub submitter.
pub fn build_test_app() -> Router {
    build_test_app_with(test_state(Arc::new(StubSubmitter::ok())))
}

/// Build the full application router over an existing state.
///
/// Uses the same `build_app_router` as `main.rs`, so the middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) is exercised too.
pub fn build_test_app_with(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// A valid bearer token for a dashboard member.
pub fn member_token() -> String {
    generate_access_token("member-1", "owner", &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_bytes(
    app: Router,
    uri: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(bytes))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
