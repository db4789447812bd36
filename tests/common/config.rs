//! Test configuration helpers: mock-backed pipelines and live-test
//! credentials loaded from the environment.

use std::time::Duration;

use tempfile::TempDir;
use wiremock::MockServer;

use newsflow::config::TranslatorProvider;
use newsflow::{Config, Database, NewsPipeline, SourceConfig};

/// Base config writing into the temp dir, with no per-item delay and no
/// auto-commit on the site working copy
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.pipeline.item_delay = Duration::ZERO;
    config.site.repo_path = dir.path().join("site");
    config.site.auto_commit = false;
    config
}

/// Source polling the mock server's feed
pub fn mock_source(server: &MockServer) -> SourceConfig {
    SourceConfig {
        name: "mock".to_string(),
        feeds: vec![format!("{}/feed.xml", server.uri())],
        enabled: true,
    }
}

/// Point the translator at a mock (or live) LibreTranslate host
pub fn use_libretranslate(config: &mut Config, host: &str) {
    config.translator.provider = TranslatorProvider::LibreTranslate;
    config.translator.libretranslate.host = host.to_string();
}

/// Build a pipeline over a fresh SQLite store inside the temp dir
pub async fn build_pipeline(config: Config, dir: &TempDir) -> NewsPipeline {
    let db = Database::new(&dir.path().join("news.db")).await.unwrap();
    NewsPipeline::new(config, db).await.unwrap()
}

/// Feed URL for live ingestion tests, from `NEWSFLOW_LIVE_FEED`
pub fn live_feed_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("NEWSFLOW_LIVE_FEED").ok()
}

/// LibreTranslate host for live translation tests, from `LIBRETRANSLATE_HOST`
pub fn live_libretranslate_host() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("LIBRETRANSLATE_HOST").ok()
}

/// DeepL API key for live translation tests, from `DEEPL_API_KEY`
pub fn live_deepl_key() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DEEPL_API_KEY").ok()
}
