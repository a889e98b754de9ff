//! Route definitions for the activity feed, mounted at `/events`.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// ```text
/// GET /recent -> recent
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/recent", get(events::recent))
}
