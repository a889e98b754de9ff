//! Route definitions for the collection wizard, mounted at `/collection`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use cenphi_core::testimonial::TestimonialType;

use crate::handlers::collection;
use crate::state::AppState;

/// ```text
/// GET    /prompts                             -> list_prompts
/// POST   /sessions                            -> create_session
/// GET    /sessions/{id}                       -> get_session
/// DELETE /sessions/{id}                       -> delete_session
/// POST   /sessions/{id}/type                  -> select_type
/// POST   /sessions/{id}/option                -> select_option
/// POST   /sessions/{id}/change-type           -> change_type
/// POST   /sessions/{id}/next                  -> next_prompt
/// POST   /sessions/{id}/segments              -> add_segment
/// POST   /sessions/{id}/text                  -> set_text
/// POST   /sessions/{id}/recording/{action}    -> recording
/// POST   /sessions/{id}/complete              -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/prompts", get(collection::list_prompts))
        .route("/sessions", post(collection::create_session))
        .route(
            "/sessions/{id}",
            get(collection::get_session).delete(collection::delete_session),
        )
        .route("/sessions/{id}/type", post(collection::select_type))
        .route("/sessions/{id}/option", post(collection::select_option))
        .route("/sessions/{id}/change-type", post(collection::change_type))
        .route("/sessions/{id}/next", post(collection::next_prompt))
        .route(
            "/sessions/{id}/segments",
            post(collection::add_segment)
                .layer(DefaultBodyLimit::max(TestimonialType::Video.max_upload_bytes())),
        )
        .route("/sessions/{id}/text", post(collection::set_text))
        .route(
            "/sessions/{id}/recording/{action}",
            post(collection::recording),
        )
        .route("/sessions/{id}/complete", post(collection::complete))
}
