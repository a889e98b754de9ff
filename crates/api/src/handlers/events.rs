//! Handler for the dashboard activity feed.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

/// GET /api/v1/events/recent
///
/// Most recent platform events, newest first.
pub async fn recent(
    _member: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let events = state.event_log.recent(limit).await;
    Ok(Json(DataResponse { data: events }))
}
