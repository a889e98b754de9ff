//! Handlers for the embeddable widget.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use cenphi_core::widget::{Device, WidgetConfig};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// File names of the prebuilt widget assets under `/widget`.
pub const SCRIPT_FILE: &str = "cenphi-widget.js";
pub const STYLESHEET_FILE: &str = "cenphi-widget.css";

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub snippet: String,
    pub script_url: String,
    pub stylesheet_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DisplayRequest {
    pub config: WidgetConfig,
    pub page: String,
    pub device: Device,
}

#[derive(Debug, Serialize)]
pub struct DisplayResponse {
    pub display: bool,
}

/// POST /api/v1/widget/embed
///
/// Validate a widget configuration and return the HTML snippet a host page
/// pastes to install it.
pub async fn embed(
    State(state): State<AppState>,
    Json(config): Json<WidgetConfig>,
) -> AppResult<impl IntoResponse> {
    config.check()?;

    let base = &state.config.public_base_url;
    let script_url = format!("{base}/widget/{SCRIPT_FILE}");
    let stylesheet_url = format!("{base}/widget/{STYLESHEET_FILE}");
    let snippet = config.embed_snippet(&script_url, &stylesheet_url)?;

    tracing::info!(
        company = %config.customization.company_name,
        formats = config.formats.len(),
        "Widget embed snippet generated"
    );

    Ok(Json(DataResponse {
        data: EmbedResponse {
            snippet,
            script_url,
            stylesheet_url,
        },
    }))
}

/// POST /api/v1/widget/display
///
/// Whether the widget should appear on `page` for `device`.
pub async fn display(Json(input): Json<DisplayRequest>) -> AppResult<impl IntoResponse> {
    input.config.check()?;
    let display = input.config.should_display(&input.page, input.device);
    Ok(Json(DataResponse {
        data: DisplayResponse { display },
    }))
}
