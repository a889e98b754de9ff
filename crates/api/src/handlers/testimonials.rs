//! Handlers for the testimonial moderation board.
//!
//! Creating a testimonial is public (the collection widget posts here);
//! reading and moderating require a signed-in member.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cenphi_core::analysis::AnalysisKind;
use cenphi_core::error::CoreError;
use cenphi_core::moderation::TestimonialFilter;
use cenphi_core::testimonial::{ContentStatus, NewTestimonial, TestimonialType};
use cenphi_core::types::Timestamp;
use cenphi_events::{names, PlatformEvent};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const SOURCE_TYPE: &str = "testimonial";

/// Query parameters for listing. `status` and `type` take comma-separated
/// values; `created_from` and `created_to` are RFC 3339 timestamps.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub workspace_id: Option<Uuid>,
    pub min_rating: Option<f32>,
    pub max_rating: Option<f32>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub search: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> AppResult<TestimonialFilter> {
        if let (Some(min), Some(max)) = (self.min_rating, self.max_rating) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min_rating {min} is greater than max_rating {max}"
                ))
                .into());
            }
        }
        if let (Some(from), Some(to)) = (self.created_from, self.created_to) {
            if from > to {
                return Err(
                    CoreError::Validation("created_from is after created_to".into()).into(),
                );
            }
        }

        Ok(TestimonialFilter {
            statuses: split_csv(self.status.as_deref())
                .map(ContentStatus::parse)
                .collect::<Result<_, _>>()?,
            types: split_csv(self.kind.as_deref())
                .map(TestimonialType::parse)
                .collect::<Result<_, _>>()?,
            workspace_id: self.workspace_id,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            created_from: self.created_from,
            created_to: self.created_to,
            search: self.search,
        })
    }
}

fn split_csv<'a>(value: Option<&'a str>) -> impl Iterator<Item = &'a str> + 'a {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/v1/testimonials
pub async fn list(
    member: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let items = state.board.read().await.list(&filter);

    tracing::debug!(member_id = %member.member_id, count = items.len(), "Listed testimonials");
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/testimonials/counts
///
/// Number of testimonials per status, for the dashboard tabs.
pub async fn status_counts(
    _member: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = state.board.read().await.status_counts();
    Ok(Json(DataResponse { data: counts }))
}

/// POST /api/v1/testimonials
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewTestimonial>,
) -> AppResult<impl IntoResponse> {
    let testimonial = state.board.write().await.create(input)?;

    tracing::info!(
        testimonial_id = %testimonial.id,
        workspace_id = %testimonial.workspace_id,
        kind = testimonial.kind.as_str(),
        "Testimonial created"
    );
    state.event_bus.publish(
        PlatformEvent::new(names::TESTIMONIAL_CREATED)
            .with_source(SOURCE_TYPE, testimonial.id)
            .with_payload(serde_json::json!({
                "workspace_id": testimonial.workspace_id,
                "type": testimonial.kind,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// GET /api/v1/testimonials/{id}
pub async fn get_by_id(
    _member: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let testimonial = state.board.read().await.get(id)?.clone();
    Ok(Json(DataResponse { data: testimonial }))
}

/// PUT /api/v1/testimonials/{id}/status
pub async fn update_status(
    member: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = ContentStatus::parse(&input.status)?;
    let testimonial = state.board.write().await.set_status(id, status)?;

    tracing::info!(
        testimonial_id = %id,
        member_id = %member.member_id,
        status = status.as_str(),
        "Testimonial status changed"
    );
    state.event_bus.publish(
        PlatformEvent::new(names::TESTIMONIAL_STATUS_CHANGED)
            .with_source(SOURCE_TYPE, id)
            .with_actor(&member.member_id)
            .with_payload(serde_json::json!({ "status": status })),
    );

    Ok(Json(DataResponse { data: testimonial }))
}

/// GET /api/v1/testimonials/{id}/analysis/{kind}
///
/// Runs the analysis outside the board lock. Analysis failures come back
/// as an `{"error": ...}` value with status 200.
pub async fn analysis(
    _member: AuthUser,
    State(state): State<AppState>,
    Path((id, kind)): Path<(Uuid, String)>,
) -> AppResult<impl IntoResponse> {
    let testimonial = state.board.read().await.get(id)?.clone();
    let kind = AnalysisKind::parse(&kind);

    let result = state.analysis.analyze(&kind, &testimonial).await;

    tracing::debug!(testimonial_id = %id, kind = kind.as_str(), "Analysis produced");
    Ok(Json(DataResponse { data: result }))
}
