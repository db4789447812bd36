//! REST API server example
//!
//! This example shows how to run newsflow with the REST API, allowing
//! pipeline control via HTTP endpoints.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:8080/swagger-ui
//! - Trigger a cycle via POST http://localhost:8080/api/pipeline/run
//! - List recent articles via GET http://localhost:8080/api/articles
//! - Check store counters via GET http://localhost:8080/api/stats

use std::net::SocketAddr;
use std::sync::Arc;

use newsflow::api::start_api_server;
use newsflow::config::ApiConfig;
use newsflow::{Config, Database, NewsPipeline, SourceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Configure the API
    let api = ApiConfig {
        bind_address: "127.0.0.1:8080".parse::<SocketAddr>()?,
        cors_enabled: true,
        swagger_ui: true,
    };

    // Build configuration
    let config = Config {
        api,
        sources: vec![SourceConfig {
            name: "example".to_string(),
            feeds: vec!["https://example.com/feed.xml".to_string()],
            enabled: true,
        }],
        ..Default::default()
    };

    // Create the pipeline instance
    let db = Database::new(config.database_path()).await?;
    let pipeline = Arc::new(NewsPipeline::new(config.clone(), db).await?);

    println!("🚀 Starting newsflow REST API server");
    println!("📖 Swagger UI: http://localhost:8080/swagger-ui");
    println!("📡 API Base: http://localhost:8080/api");
    println!();
    println!("Example commands:");
    println!("  # Run one full pipeline cycle");
    println!("  curl -X POST http://localhost:8080/api/pipeline/run");
    println!();
    println!("  # Translate up to 5 pending articles");
    println!("  curl -X POST http://localhost:8080/api/pipeline/translate \\");
    println!("    -H 'Content-Type: application/json' -d '{{\"limit\": 5}}'");
    println!();
    println!("  # Recent articles");
    println!("  curl 'http://localhost:8080/api/articles?limit=10'");

    // Serve until the process is stopped
    start_api_server(pipeline, Arc::new(config)).await?;

    Ok(())
}
