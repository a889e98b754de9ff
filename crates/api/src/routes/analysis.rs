//! Root-level analysis endpoint, outside `/api/v1` because the collection
//! submitter posts to this fixed path.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use cenphi_core::testimonial::TestimonialType;

use crate::handlers::analysis;
use crate::state::AppState;

/// ```text
/// POST /api/analyze-testimonial -> analyze_testimonial
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/analyze-testimonial",
        post(analysis::analyze_testimonial)
            .layer(DefaultBodyLimit::max(TestimonialType::Video.max_upload_bytes())),
    )
}
