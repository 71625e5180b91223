//! Health check endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, HealthResponse};

/// `GET /health`: liveness plus the size of the loaded metric table.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let metrics_loaded = ctx.metrics.len()?;

    Ok(Json(HealthResponse {
        status: "ok",
        metrics_loaded,
        version: crate::config::APP_VERSION,
    }))
}
