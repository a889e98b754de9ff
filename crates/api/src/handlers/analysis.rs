//! Handler for the testimonial analysis endpoint.
//!
//! This is the endpoint finished collections are submitted to. It answers
//! with a bare [`AiFeedback`] object (no envelope) so the wizard can store
//! the body as its feedback directly.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct TextSubmission {
    text: String,
}

/// POST /api/analyze-testimonial
///
/// Accepts either JSON `{ "text": ... }` or a raw media body.
pub async fn analyze_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".into()));
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let feedback = if is_json {
        let submission: TextSubmission = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid text submission: {e}")))?;
        tracing::info!(chars = submission.text.chars().count(), "Analyzing text testimonial");
        state.analysis.feedback(Some(submission.text.as_str()), 0).await
    } else {
        tracing::info!(bytes = body.len(), "Analyzing media testimonial");
        state.analysis.feedback(None, body.len()).await
    };

    Ok(Json(feedback))
}
