use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::api::response::Envelope;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct DataBody<T: Serialize> {
    pub data: T,
}

/// GET /api/analytics/platform - admin
pub async fn platform(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.analytics.platform_overview().await?;
    Ok(Envelope::ok(
        "Analytics retrieved successfully",
        DataBody { data },
    ))
}

/// GET /api/analytics/detailed - admin
pub async fn detailed(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.analytics.detailed().await?;
    Ok(Envelope::ok(
        "Detailed analytics retrieved successfully",
        DataBody { data },
    ))
}

/// GET /api/analytics/users - admin
pub async fn user_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.analytics.user_stats().await?;
    Ok(Envelope::ok(
        "User statistics retrieved successfully",
        DataBody { data },
    ))
}
