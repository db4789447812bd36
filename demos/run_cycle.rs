//! Basic pipeline cycle example
//!
//! This example demonstrates the core functionality of newsflow:
//! - Configuring a feed source and translator
//! - Creating a pipeline instance
//! - Running one full ingest/translate/publish cycle
//! - Reading the pass reports

use newsflow::config::{SiteConfig, TranslatorConfig, TranslatorProvider};
use newsflow::{Config, Database, NewsPipeline, SourceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Configure a news source
    let source = SourceConfig {
        name: "example".to_string(),
        feeds: vec!["https://example.com/feed.xml".to_string()],
        enabled: true,
    };

    // Build configuration: local Ollama translation, local site working copy
    let config = Config {
        sources: vec![source],
        translator: TranslatorConfig {
            provider: TranslatorProvider::Ollama,
            ..Default::default()
        },
        site: SiteConfig {
            repo_path: "./blog".into(),
            auto_commit: false,
            ..Default::default()
        },
        ..Default::default()
    };

    // Create the pipeline over a local SQLite store
    let db = Database::new(config.database_path()).await?;
    let pipeline = NewsPipeline::new(config.clone(), db).await?;

    // One full cycle: ingest, translate, publish
    let report = pipeline.run().await;

    println!(
        "Ingest:    {} new, {} skipped, {} errors",
        report.ingest.ingested, report.ingest.skipped, report.ingest.errors
    );
    println!(
        "Translate: {} of {} selected, {} errors",
        report.translate.translated, report.translate.selected, report.translate.errors
    );
    println!(
        "Publish:   {} of {} selected, {} errors",
        report.publish.published, report.publish.selected, report.publish.errors
    );

    Ok(())
}
