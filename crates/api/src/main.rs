use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cenphi_core::analysis::CannedAnalysis;
use cenphi_core::moderation::TestimonialBoard;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cenphi_api::client::HttpSubmitter;
use cenphi_api::config::ServerConfig;
use cenphi_api::router::build_app_router;
use cenphi_api::sessions::SessionRegistry;
use cenphi_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cenphi_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Analysis and submission ---
    let analysis = Arc::new(CannedAnalysis::new(Duration::from_millis(
        config.analysis_delay_ms,
    )));
    let submitter = Arc::new(
        HttpSubmitter::new(config.submission_url.clone(), config.submission_timeout())
        .expect("Failed to build submission client"),
    );
    tracing::info!(url = %config.submission_url, "Submission client ready");

    // --- Event bus ---
    let event_bus = Arc::new(cenphi_events::EventBus::default());
    let event_log = Arc::new(cenphi_events::EventLog::default());

    let log_cancel = CancellationToken::new();
    let log_handle = {
        let event_log = Arc::clone(&event_log);
        let receiver = event_bus.subscribe();
        let cancel = log_cancel.clone();
        tokio::spawn(async move { event_log.run(receiver, cancel).await })
    };
    tracing::info!("Event log started");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
        board: Arc::new(RwLock::new(TestimonialBoard::new())),
        analysis,
        submitter,
        event_bus: Arc::clone(&event_bus),
        event_log,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    log_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        log_handle,
    )
    .await;
    tracing::info!("Event log stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
