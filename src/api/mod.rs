//! REST API server module
//!
//! Exposes the pipeline passes and the article store over an OpenAPI
//! documented HTTP surface.

use crate::pipeline::NewsPipeline;
use crate::{Config, Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Pipeline
/// - `POST /api/pipeline/ingest` - Poll every enabled feed, store new articles
/// - `POST /api/pipeline/translate` - Translate pending articles
/// - `POST /api/pipeline/publish` - Publish translated articles
/// - `POST /api/pipeline/rescrape` - Re-extract empty-content articles
/// - `POST /api/pipeline/run` - One full ingest/translate/publish cycle
///
/// ## Articles
/// - `GET /api/articles` - Most recently fetched articles
/// - `GET /api/articles/:id` - Single article by id
///
/// ## System
/// - `GET /api/stats` - Article store counters
/// - `GET /api/health` - Health check
/// - `GET /api-docs/openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(pipeline: Arc<NewsPipeline>, config: Arc<Config>) -> Router {
    let state = ApiState::new(pipeline, config.clone());

    let router = Router::new()
        // Pipeline passes
        .route("/api/pipeline/ingest", post(routes::run_ingest))
        .route("/api/pipeline/translate", post(routes::run_translate))
        .route("/api/pipeline/publish", post(routes::run_publish))
        .route("/api/pipeline/rescrape", post(routes::run_rescrape))
        .route("/api/pipeline/run", post(routes::run_cycle))
        // Articles
        .route("/api/articles", get(routes::list_articles))
        .route("/api/articles/:id", get(routes::get_article))
        // System
        .route("/api/stats", get(routes::store_stats))
        .route("/api/health", get(routes::health_check));

    // SwaggerUi registers the spec route itself; when it is disabled the
    // plain handler keeps the spec reachable at the same path.
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router.route("/api-docs/openapi.json", get(routes::openapi_spec))
    };

    // Add state to all routes
    let router = router.with_state(state);

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to `ApiConfig::bind_address`, and serves
/// the router. Runs until the server is shut down.
///
/// # Example
///
/// ```no_run
/// use newsflow::{Config, Database, NewsPipeline};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let db = Database::new(config.database_path()).await?;
/// let pipeline = Arc::new(NewsPipeline::new(config.clone(), db).await?);
///
/// // Start API server (blocks until shutdown)
/// newsflow::api::start_api_server(pipeline, Arc::new(config)).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error when the listener cannot bind or the server exits
/// abnormally.
pub async fn start_api_server(pipeline: Arc<NewsPipeline>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.bind_address();

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(pipeline, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
