//! # newsflow
//!
//! News aggregation pipeline: ingest web feeds, extract article content,
//! translate it, and publish the result to a git-backed static site.
//!
//! ## Design Philosophy
//!
//! newsflow is designed to be:
//! - **Pass-based** - Every stage runs as a bounded pass and returns a report
//! - **Idempotent** - Articles are keyed by source URL; re-running skips work
//! - **Resilient** - Per-item failures land in the report, never abort a pass
//! - **Library-first** - An embeddable crate; the REST API rides on top
//!
//! ## Quick Start
//!
//! ```no_run
//! use newsflow::{Config, Database, NewsPipeline, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         sources: vec![SourceConfig {
//!             name: "example".to_string(),
//!             feeds: vec!["https://example.com/feed.xml".to_string()],
//!             enabled: true,
//!         }],
//!         ..Default::default()
//!     };
//!
//!     let db = Database::new(config.database_path()).await?;
//!     let pipeline = NewsPipeline::new(config.clone(), db).await?;
//!
//!     // One full cycle: ingest, translate, publish
//!     let report = pipeline.run().await;
//!     println!(
//!         "{} ingested, {} translated, {} published",
//!         report.ingest.ingested, report.translate.translated, report.publish.published
//!     );
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Article content extraction
pub mod extract;
/// Feed polling and parsing
pub mod feeds;
/// Pass coordination
pub mod pipeline;
/// Site publication backends
pub mod publish;
/// Markdown rendering for the static site
pub mod render;
/// Periodic full-cycle scheduling
pub mod scheduler;
/// Article page fetching
pub mod scrape;
/// Translation backends
pub mod translate;
/// Core types and pass reports
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, SourceConfig, TranslatorProvider};
pub use db::{Article, Database, NewArticle};
pub use error::{
    ApiError, DatabaseError, Error, ErrorDetail, FeedError, PublishError, Result, ToHttpStatus,
    TranslateError,
};
pub use pipeline::NewsPipeline;
pub use publish::{GitHubPublisher, LocalPublisher, PublishFile, Publisher};
pub use scheduler::PipelineScheduler;
pub use types::{
    ArticleId, IngestReport, PublishReport, RescrapeReport, RunReport, StoreStats, TranslateReport,
};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run the scheduler and API server until a termination signal arrives.
///
/// Spawns the periodic full-cycle scheduler and the REST API server, then
/// waits for a signal. On shutdown the scheduler is cancelled and awaited,
/// so a cycle already in flight finishes before the call returns.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use newsflow::{Config, Database, NewsPipeline, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let db = Database::new(config.database_path()).await?;
///     let pipeline = NewsPipeline::new(config.clone(), db).await?;
///
///     // Schedule cycles and serve the API with automatic signal handling
///     run_with_shutdown(pipeline, config).await?;
///
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Returns an error when the API server exits abnormally before a signal
/// arrives, typically a failed bind.
pub async fn run_with_shutdown(pipeline: NewsPipeline, config: Config) -> Result<()> {
    let pipeline = Arc::new(pipeline);
    let config = Arc::new(config);

    let cancel = CancellationToken::new();
    let scheduler = PipelineScheduler::new(
        pipeline.clone(),
        config.pipeline.run_interval,
        cancel.clone(),
    );
    let scheduler_handle = scheduler.spawn();

    let mut api_handle = tokio::spawn({
        let pipeline = pipeline.clone();
        let config = config.clone();
        async move { api::start_api_server(pipeline, config).await }
    });

    tokio::select! {
        _ = wait_for_signal() => {
            api_handle.abort();
        }
        result = &mut api_handle => {
            // The server exiting on its own means it failed to bind or serve
            cancel.cancel();
            if let Err(e) = scheduler_handle.await {
                tracing::warn!(error = %e, "Scheduler task ended abnormally");
            }
            return match result {
                Ok(server_result) => server_result,
                Err(e) => Err(Error::ApiServerError(e.to_string())),
            };
        }
    }

    cancel.cancel();
    if let Err(e) = scheduler_handle.await {
        tracing::warn!(error = %e, "Scheduler task ended abnormally");
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
