//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`pipeline`] — Triggering pipeline passes
//! - [`articles`] — Browsing the article store
//! - [`system`] — Health, store statistics, OpenAPI spec

use serde::{Deserialize, Serialize};

mod articles;
mod pipeline;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use articles::*;
pub use pipeline::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /api/pipeline/translate and /api/pipeline/publish
///
/// The body may be omitted entirely; the configured batch size then applies.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BatchRequest {
    /// Maximum number of articles to process in this pass
    pub limit: Option<usize>,
}

/// Query parameters for GET /api/articles
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ArticlesQuery {
    /// Maximum number of articles to return (default: 20, max: 100)
    pub limit: Option<usize>,
}

/// Response for GET /api/stats - store counters plus derived backlog counts
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    /// Total number of stored articles
    pub total: i64,
    /// Articles with a stored translation
    pub translated: i64,
    /// Articles published to the site
    pub published: i64,
    /// Articles awaiting translation (includes empty-content ones)
    pub pending: i64,
    /// Translated articles awaiting publication
    pub unpublished: i64,
}
