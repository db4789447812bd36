//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the newsflow REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the newsflow REST API
///
/// This struct is used to generate the OpenAPI specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/api-docs/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "newsflow REST API",
        version = "0.2.0",
        description = "REST API for driving the news pipeline: feed ingestion, article translation, and publication to a git-backed site",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    paths(
        // Pipeline passes
        crate::api::routes::run_ingest,
        crate::api::routes::run_translate,
        crate::api::routes::run_publish,
        crate::api::routes::run_rescrape,
        crate::api::routes::run_cycle,

        // Articles
        crate::api::routes::list_articles,
        crate::api::routes::get_article,

        // System
        crate::api::routes::store_stats,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::ArticleId,
        crate::types::IngestReport,
        crate::types::TranslateReport,
        crate::types::PublishReport,
        crate::types::RescrapeReport,
        crate::types::RunReport,
        crate::types::StoreStats,

        // Article model from db
        crate::db::Article,

        // API request/response types from routes
        crate::api::routes::BatchRequest,
        crate::api::routes::StatsResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "pipeline", description = "Pipeline passes - Trigger ingestion, translation, publication, and re-extraction"),
        (name = "articles", description = "Article store - Browse ingested articles and their pipeline state"),
        (name = "system", description = "System endpoints - Health check, store statistics, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
