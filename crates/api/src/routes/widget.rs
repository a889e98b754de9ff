//! Route definitions for the widget API, mounted at `/widget`.

use axum::routing::post;
use axum::Router;

use crate::handlers::widget;
use crate::state::AppState;

/// ```text
/// POST /embed   -> embed
/// POST /display -> display
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/embed", post(widget::embed))
        .route("/display", post(widget::display))
}
