//! Route definitions for guard evaluation, mounted at `/guards`.

use axum::routing::post;
use axum::Router;

use crate::handlers::guards;
use crate::state::AppState;

/// ```text
/// POST /{kind} -> evaluate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}", post(guards::evaluate))
}
