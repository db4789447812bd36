//! Pipeline pass handlers.
//!
//! Each handler triggers one pass synchronously and returns its report; a
//! pass failure surfaces as the standard error envelope.

use super::BatchRequest;
use crate::api::ApiState;
use axum::{Json, extract::State};

use crate::error::Error;
use crate::types::{IngestReport, PublishReport, RescrapeReport, RunReport, TranslateReport};

/// POST /api/pipeline/ingest - Poll every enabled feed and store new articles
#[utoipa::path(
    post,
    path = "/api/pipeline/ingest",
    tag = "pipeline",
    responses(
        (status = 200, description = "Ingestion pass summary", body = IngestReport),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn run_ingest(State(state): State<ApiState>) -> Result<Json<IngestReport>, Error> {
    match state.pipeline.ingest().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "Ingest pass failed");
            Err(e)
        }
    }
}

/// POST /api/pipeline/translate - Translate pending articles
///
/// Accepts an optional body overriding the configured batch size.
#[utoipa::path(
    post,
    path = "/api/pipeline/translate",
    tag = "pipeline",
    request_body(content = BatchRequest, description = "Optional batch size override"),
    responses(
        (status = 200, description = "Translation pass summary", body = TranslateReport),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn run_translate(
    State(state): State<ApiState>,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<TranslateReport>, Error> {
    let limit = body
        .and_then(|Json(req)| req.limit)
        .unwrap_or(state.config.pipeline.translate_batch);

    match state.pipeline.translate(limit).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "Translate pass failed");
            Err(e)
        }
    }
}

/// POST /api/pipeline/publish - Publish translated articles
///
/// Accepts an optional body overriding the configured batch size.
#[utoipa::path(
    post,
    path = "/api/pipeline/publish",
    tag = "pipeline",
    request_body(content = BatchRequest, description = "Optional batch size override"),
    responses(
        (status = 200, description = "Publication pass summary", body = PublishReport),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn run_publish(
    State(state): State<ApiState>,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<PublishReport>, Error> {
    let limit = body
        .and_then(|Json(req)| req.limit)
        .unwrap_or(state.config.pipeline.publish_batch);

    match state.pipeline.publish(limit).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "Publish pass failed");
            Err(e)
        }
    }
}

/// POST /api/pipeline/rescrape - Re-extract content for empty-content articles
#[utoipa::path(
    post,
    path = "/api/pipeline/rescrape",
    tag = "pipeline",
    responses(
        (status = 200, description = "Re-extraction pass summary", body = RescrapeReport),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn run_rescrape(State(state): State<ApiState>) -> Result<Json<RescrapeReport>, Error> {
    match state.pipeline.rescrape().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "Rescrape pass failed");
            Err(e)
        }
    }
}

/// POST /api/pipeline/run - One full cycle: ingest, translate, publish
///
/// Pass failures are absorbed into the per-pass reports, so this always
/// returns 200 with the combined summary.
#[utoipa::path(
    post,
    path = "/api/pipeline/run",
    tag = "pipeline",
    responses(
        (status = 200, description = "Combined cycle summary", body = RunReport)
    )
)]
pub async fn run_cycle(State(state): State<ApiState>) -> Json<RunReport> {
    Json(state.pipeline.run().await)
}
