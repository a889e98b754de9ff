//! Route definitions for the moderation board, mounted at `/testimonials`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::testimonials;
use crate::state::AppState;

/// ```text
/// GET  /                       -> list
/// POST /                       -> create
/// GET  /counts                 -> status_counts
/// GET  /{id}                   -> get_by_id
/// PUT  /{id}/status            -> update_status
/// GET  /{id}/analysis/{kind}   -> analysis
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::list).post(testimonials::create))
        .route("/counts", get(testimonials::status_counts))
        .route("/{id}", get(testimonials::get_by_id))
        .route("/{id}/status", put(testimonials::update_status))
        .route("/{id}/analysis/{kind}", get(testimonials::analysis))
}
