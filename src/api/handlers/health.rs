//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use utoipa::ToSchema;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, ApiResult, ok};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
    /// Crate version and build git hash
    #[schema(example = "0.1.0+a1b2c3d")]
    pub version: String,
}

/// Health check endpoint
///
/// Pings PostgreSQL when configured. Does NOT expose dependency details.
///
/// - Healthy: 200 OK + {code: 0, data: {timestampMs, version}}
/// - Unhealthy: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    if let Some(db) = &state.db
        && let Err(e) = db.health_check().await
    {
        tracing::error!(error = %e, "[HEALTH] PostgreSQL ping failed");
        return ApiError::service_unavailable("unavailable").into_err();
    }

    ok(HealthResponse {
        timestamp_ms: now_ms,
        version: env!("PAYLINK_BUILD").to_string(),
    })
}
