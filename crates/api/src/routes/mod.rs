pub mod analysis;
pub mod collection;
pub mod events;
pub mod guards;
pub mod health;
pub mod testimonials;
pub mod widget;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /collection/prompts                              guided prompt catalog
/// /collection/sessions                             start session (POST)
/// /collection/sessions/{id}                        get, discard
/// /collection/sessions/{id}/type                   select testimonial type
/// /collection/sessions/{id}/option                 select input option
/// /collection/sessions/{id}/change-type            back to type selection
/// /collection/sessions/{id}/next                   advance prompt
/// /collection/sessions/{id}/segments               append media segment
/// /collection/sessions/{id}/text                   store written answer
/// /collection/sessions/{id}/recording/{action}     start, pause, resume, stop
/// /collection/sessions/{id}/complete               submit for analysis
///
/// /guards/{kind}                                   evaluate route guard
///
/// /testimonials                                    list (auth), create (public)
/// /testimonials/counts                             per-status counts (auth)
/// /testimonials/{id}                               get (auth)
/// /testimonials/{id}/status                        moderate (auth, PUT)
/// /testimonials/{id}/analysis/{kind}               run analysis (auth)
///
/// /widget/embed                                    validate config, build snippet
/// /widget/display                                  evaluate display rules
///
/// /events/recent                                   activity feed (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/collection", collection::router())
        .nest("/guards", guards::router())
        .nest("/testimonials", testimonials::router())
        .nest("/widget", widget::router())
        .nest("/events", events::router())
}
