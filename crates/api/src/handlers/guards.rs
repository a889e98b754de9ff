//! Handler for protected-route guard evaluation.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::Json;
use cenphi_core::error::CoreError;
use cenphi_core::guards::{self, AuthSnapshot, GuardKind, MemberState, RouteLocation};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;

/// What the client knows when it navigates.
#[derive(Debug, Deserialize)]
pub struct GuardRequest {
    pub auth: AuthSnapshot,
    pub member: MemberState,
    pub location: RouteLocation,
}

fn parse_kind(s: &str) -> Result<GuardKind, CoreError> {
    match s {
        "dashboard" => Ok(GuardKind::Dashboard),
        "onboarding" => Ok(GuardKind::Onboarding),
        "generic" => Ok(GuardKind::Generic),
        _ => Err(CoreError::Validation(format!(
            "Invalid guard '{s}'. Must be one of: dashboard, onboarding, generic"
        ))),
    }
}

/// POST /api/v1/guards/{kind}
pub async fn evaluate(
    Path(kind): Path<String>,
    Json(input): Json<GuardRequest>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    let decision = guards::evaluate(kind, input.auth, &input.member, &input.location);

    tracing::debug!(
        guard = ?kind,
        path = %input.location.path,
        decision = ?decision,
        "Guard evaluated"
    );

    Ok(Json(DataResponse { data: decision }))
}
