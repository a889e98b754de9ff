use std::path::PathBuf;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Seconds to wait for background tasks after the listener stops.
    pub shutdown_timeout_secs: u64,
    /// Directory holding the prebuilt widget script and stylesheet.
    pub widget_assets_dir: PathBuf,
    /// Public origin used to build widget asset URLs in embed snippets.
    pub public_base_url: String,
    /// Simulated analysis latency in milliseconds (default: `1500`).
    pub analysis_delay_ms: u64,
    /// Where finished collections are submitted for analysis.
    pub submission_url: String,
    /// Upper bound on one submission round trip (default: `20`). Kept below
    /// `request_timeout_secs`, see [`ServerConfig::submission_timeout`].
    pub submission_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                            |
    /// |-------------------------|----------------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                          |
    /// | `PORT`                  | `3000`                                             |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                            |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                               |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                               |
    /// | `WIDGET_ASSETS_DIR`     | `public/widget`                                    |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:{PORT}`                          |
    /// | `ANALYSIS_DELAY_MS`     | `1500`                                             |
    /// | `SUBMISSION_URL`        | `http://127.0.0.1:{PORT}/api/analyze-testimonial`  |
    /// | `SUBMISSION_TIMEOUT_SECS` | `20`                                             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let widget_assets_dir = std::env::var("WIDGET_ASSETS_DIR")
            .unwrap_or_else(|_| "public/widget".into())
            .into();

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let analysis_delay_ms: u64 = std::env::var("ANALYSIS_DELAY_MS")
            .unwrap_or_else(|_| "1500".into())
            .parse()
            .expect("ANALYSIS_DELAY_MS must be a valid u64");

        let submission_url = std::env::var("SUBMISSION_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{port}/api/analyze-testimonial"));

        let submission_timeout_secs: u64 = std::env::var("SUBMISSION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("SUBMISSION_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            widget_assets_dir,
            public_base_url,
            analysis_delay_ms,
            submission_url,
            submission_timeout_secs,
            jwt,
        }
    }

    /// Timeout for the submission client.
    ///
    /// At least one second, and a second shorter than the request timeout
    /// whenever that allows it, so `/complete` can still report an upstream
    /// timeout.
    pub fn submission_timeout(&self) -> Duration {
        let ceiling = self.request_timeout_secs.saturating_sub(1).max(1);
        Duration::from_secs(self.submission_timeout_secs.clamp(1, ceiling))
    }
}
