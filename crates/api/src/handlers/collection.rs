//! Handlers for the guided collection wizard.
//!
//! Every session endpoint locks the session's store, applies one store
//! operation and answers with the resulting [`CollectionSnapshot`]. Which
//! page the client shows next is the client's decision.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use cenphi_core::collection::{
    Advance, CollectionSnapshot, InputOption, MediaBlob, MediaBuffer, SubmitReport,
};
use cenphi_core::error::CoreError;
use cenphi_core::prompts::GUIDED_PROMPTS;
use cenphi_core::testimonial::TestimonialType;
use cenphi_events::{names, PlatformEvent};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const SOURCE_TYPE: &str = "collection_session";

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SelectTypeRequest {
    #[serde(rename = "type")]
    pub kind: TestimonialType,
}

#[derive(Debug, Deserialize)]
pub struct SelectOptionRequest {
    pub option: InputOption,
}

#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordingParams {
    /// Seconds recorded in the segment being stopped.
    pub elapsed_secs: Option<f64>,
}

/// Result of advancing the wizard.
#[derive(Debug, Serialize)]
pub struct NextResponse {
    /// `false` when the session was already on its final prompt.
    pub advanced: bool,
    pub session: CollectionSnapshot,
}

/// Result of submitting the captured content.
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub report: SubmitReport,
    pub session: CollectionSnapshot,
}

// ---------------------------------------------------------------------------
// Catalog and session lifecycle
// ---------------------------------------------------------------------------

/// GET /api/v1/collection/prompts
pub async fn list_prompts() -> impl IntoResponse {
    Json(DataResponse {
        data: GUIDED_PROMPTS,
    })
}

/// POST /api/v1/collection/sessions
///
/// Start a new wizard session.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.create().await;
    let snapshot = entry.store.lock().await.snapshot();

    tracing::info!(session_id = %snapshot.session_id, "Collection session started");
    state.event_bus.publish(
        PlatformEvent::new(names::COLLECTION_STARTED).with_source(SOURCE_TYPE, &snapshot.session_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /api/v1/collection/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let snapshot = entry.store.lock().await.snapshot();
    Ok(Json(DataResponse { data: snapshot }))
}

/// DELETE /api/v1/collection/sessions/{id}
///
/// Discard a session and anything it captured.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let entry = state.sessions.get(&id).await?;
    let session_id = entry.store.lock().await.session_id().clone();
    state.sessions.remove(&session_id).await;

    tracing::info!(session_id = %session_id, "Collection session discarded");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Type selection
// ---------------------------------------------------------------------------

/// POST /api/v1/collection/sessions/{id}/type
///
/// Media types open the input options modal.
pub async fn select_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SelectTypeRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let snapshot = {
        let mut store = entry.store.lock().await;
        store.handle_type_selection(input.kind);
        store.snapshot()
    };

    tracing::info!(session_id = %id, kind = input.kind.as_str(), "Testimonial type selected");
    state.event_bus.publish(
        PlatformEvent::new(names::COLLECTION_TYPE_SELECTED)
            .with_source(SOURCE_TYPE, &id)
            .with_payload(serde_json::json!({ "type": input.kind })),
    );

    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/collection/sessions/{id}/option
pub async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SelectOptionRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let mut store = entry.store.lock().await;
    store.handle_option_select(input.option);
    Ok(Json(DataResponse {
        data: store.snapshot(),
    }))
}

/// POST /api/v1/collection/sessions/{id}/change-type
pub async fn change_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let mut store = entry.store.lock().await;
    store.change_type();
    Ok(Json(DataResponse {
        data: store.snapshot(),
    }))
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// POST /api/v1/collection/sessions/{id}/next
///
/// On the final prompt nothing changes and `advanced` is `false`.
pub async fn next_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let (outcome, snapshot) = {
        let mut store = entry.store.lock().await;
        let outcome = store.handle_next(&entry.progress);
        (outcome, store.snapshot())
    };

    let advanced = match outcome {
        Advance::Advanced { index, progress } => {
            tracing::debug!(session_id = %id, index, progress, "Advanced to next prompt");
            state.event_bus.publish(
                PlatformEvent::new(names::COLLECTION_PROMPT_ADVANCED)
                    .with_source(SOURCE_TYPE, &id)
                    .with_payload(serde_json::json!({ "index": index, "progress": progress })),
            );
            true
        }
        Advance::AtFinalPrompt => false,
    };

    Ok(Json(DataResponse {
        data: NextResponse {
            advanced,
            session: snapshot,
        },
    }))
}

// ---------------------------------------------------------------------------
// Captured content
// ---------------------------------------------------------------------------

/// POST /api/v1/collection/sessions/{id}/segments
///
/// The raw request body is one recorded segment or uploaded file; its
/// `Content-Type` is kept as the segment's MIME type.
pub async fn add_segment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Segment body is empty".into()));
    }
    let mime_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let entry = state.sessions.get(&id).await?;
    let snapshot = {
        let mut store = entry.store.lock().await;
        let kind = store.state().kind.ok_or_else(|| {
            CoreError::Validation("Select a testimonial type before adding media".into())
        })?;
        if !kind.is_media() {
            return Err(CoreError::Validation(
                "Text collections do not accept media segments".into(),
            )
            .into());
        }
        if matches!(store.data(), MediaBuffer::Text(_)) {
            return Err(CoreError::Validation(
                "This session already holds a written answer".into(),
            )
            .into());
        }
        if body.len() > kind.max_upload_bytes() {
            return Err(CoreError::Validation(format!(
                "Segment exceeds the {} byte limit for {} testimonials",
                kind.max_upload_bytes(),
                kind.as_str()
            ))
            .into());
        }
        store.handle_complete_recording_section(MediaBlob::new(&mime_type, body.to_vec()));
        store.snapshot()
    };

    tracing::info!(session_id = %id, mime_type = %mime_type, bytes = body.len(), "Segment added");
    state.event_bus.publish(
        PlatformEvent::new(names::COLLECTION_SEGMENT_ADDED)
            .with_source(SOURCE_TYPE, &id)
            .with_payload(serde_json::json!({ "mime_type": mime_type, "bytes": body.len() })),
    );

    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/collection/sessions/{id}/text
pub async fn set_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetTextRequest>,
) -> AppResult<impl IntoResponse> {
    if input.text.trim().is_empty() {
        return Err(CoreError::Validation("Text answer must not be empty".into()).into());
    }

    let entry = state.sessions.get(&id).await?;
    let mut store = entry.store.lock().await;
    match store.state().kind {
        None => {
            return Err(CoreError::Validation(
                "Select a testimonial type before writing an answer".into(),
            )
            .into())
        }
        Some(kind) if kind.is_media() => {
            return Err(CoreError::Validation(format!(
                "{} collections do not accept a written answer",
                kind.as_str()
            ))
            .into())
        }
        Some(_) => {}
    }
    if matches!(store.data(), MediaBuffer::Segments(_)) {
        return Err(
            CoreError::Validation("This session already holds recorded media".into()).into(),
        );
    }

    store.set_text(input.text);
    Ok(Json(DataResponse {
        data: store.snapshot(),
    }))
}

/// POST /api/v1/collection/sessions/{id}/recording/{action}
///
/// `action` is one of `start`, `pause`, `resume` or `stop`; `stop` takes
/// the segment length as `?elapsed_secs=`.
pub async fn recording(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
    Query(params): Query<RecordingParams>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let mut store = entry.store.lock().await;

    match action.as_str() {
        "start" => store.start_recording(),
        "pause" => store.pause_recording(),
        "resume" => store.resume_recording(),
        "stop" => store.stop_recording(params.elapsed_secs.unwrap_or_default()),
        other => {
            return Err(CoreError::Validation(format!(
                "Invalid recording action '{other}'. Must be one of: start, pause, resume, stop"
            ))
            .into())
        }
    }

    Ok(Json(DataResponse {
        data: store.snapshot(),
    }))
}

/// POST /api/v1/collection/sessions/{id}/complete
///
/// Submit the captured content once. Submission failures are reported in
/// the body, not as an error status. A delivered session is dropped; a
/// failed one stays so the client can try again.
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = state.sessions.get(&id).await?;
    let _submission = entry.begin_submission().ok_or_else(|| {
        CoreError::Conflict(format!("Collection session {id} is already being submitted"))
    })?;

    // The store is unlocked while the request is in flight.
    let body = entry.store.lock().await.submission_body();
    let (report, snapshot) = match body {
        None => (SubmitReport::Skipped, entry.store.lock().await.snapshot()),
        Some(body) => {
            let result = state.submitter.submit(body).await;
            let mut store = entry.store.lock().await;
            let report = store.record_submission(result);
            (report, store.snapshot())
        }
    };

    tracing::info!(session_id = %id, report = ?report, "Collection completed");
    if !matches!(report, SubmitReport::Skipped) {
        state.event_bus.publish(
            PlatformEvent::new(names::COLLECTION_SUBMITTED)
                .with_source(SOURCE_TYPE, &id)
                .with_payload(serde_json::to_value(&report).unwrap_or_default()),
        );
    }
    if matches!(report, SubmitReport::Sent { .. }) {
        state.sessions.remove(&snapshot.session_id).await;
        tracing::debug!(session_id = %id, "Delivered collection session dropped");
    }

    Ok(Json(DataResponse {
        data: CompleteResponse {
            report,
            session: snapshot,
        },
    }))
}
