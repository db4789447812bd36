//! Scheduled daemon example
//!
//! Runs the full service: periodic pipeline cycles plus the REST API,
//! shut down cleanly on SIGTERM/SIGINT.

use std::time::Duration;

use newsflow::config::PipelineConfig;
use newsflow::{Config, Database, NewsPipeline, SourceConfig, run_with_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let config = Config {
        sources: vec![SourceConfig {
            name: "example".to_string(),
            feeds: vec!["https://example.com/feed.xml".to_string()],
            enabled: true,
        }],
        pipeline: PipelineConfig {
            // Full cycle every two hours
            run_interval: Duration::from_secs(2 * 60 * 60),
            translate_batch: 20,
            ..Default::default()
        },
        ..Default::default()
    };

    let db = Database::new(config.database_path()).await?;
    let pipeline = NewsPipeline::new(config.clone(), db).await?;

    println!(
        "newsflow daemon: cycles every 2h, API on http://{}",
        config.bind_address()
    );

    // Schedules cycles and serves the API until a termination signal
    run_with_shutdown(pipeline, config).await?;

    Ok(())
}
