//! System endpoint handlers.

use super::StatsResponse;
use crate::api::{ApiDoc, ApiState};
use crate::error::Error;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use utoipa::OpenApi;

/// GET /api/health - Health check
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/stats - Article store counters
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "system",
    responses(
        (status = 200, description = "Store counters with derived backlog counts", body = StatsResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn store_stats(State(state): State<ApiState>) -> Result<Json<StatsResponse>, Error> {
    match state.pipeline.stats().await {
        Ok(stats) => Ok(Json(StatsResponse {
            total: stats.total,
            translated: stats.translated,
            published: stats.published,
            pending: stats.pending(),
            unpublished: stats.unpublished(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read store statistics");
            Err(e)
        }
    }
}

/// GET /api-docs/openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/api-docs/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
