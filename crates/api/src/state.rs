use std::sync::Arc;

use cenphi_core::analysis::AnalysisService;
use cenphi_core::collection::TestimonialSubmitter;
use cenphi_core::moderation::TestimonialBoard;
use cenphi_events::{EventBus, EventLog};
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live collection wizard sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Testimonials under moderation.
    pub board: Arc<RwLock<TestimonialBoard>>,
    /// Analysis backend.
    pub analysis: Arc<dyn AnalysisService>,
    /// Sends finished collections to the analysis endpoint.
    pub submitter: Arc<dyn TestimonialSubmitter>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<EventBus>,
    /// Recent events, fed from the bus.
    pub event_log: Arc<EventLog>,
}
