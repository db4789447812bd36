//! Router and server tests against a pipeline with no configured sources
//! and a local publisher writing into a temp directory.

use super::*;
use crate::db::{Database, NewArticle};
use crate::types::ArticleId;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::time::Duration;
use tempfile::tempdir;
use tower::ServiceExt;


/// Helper to create a test NewsPipeline instance wrapped in Arc
///
/// No sources are configured, so the ingest pass is a no-op, and the
/// site repository lives inside the temp dir with auto-commit off.
async fn create_test_pipeline() -> (Arc<NewsPipeline>, Arc<Config>, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.pipeline.item_delay = Duration::ZERO;
    config.site.repo_path = dir.path().join("site");
    config.site.auto_commit = false;

    let db = Database::new(&dir.path().join("news.db")).await.unwrap();
    let pipeline = NewsPipeline::new(config.clone(), db).await.unwrap();
    (Arc::new(pipeline), Arc::new(config), dir)
}

fn sample_new_article(n: i64) -> NewArticle {
    NewArticle {
        source_url: format!("https://example.com/news/article-{n}"),
        source_site: "example".to_string(),
        title: format!("Test Article {n}"),
        description: "A short summary".to_string(),
        content: "Full body text of the article.".to_string(),
        author: String::new(),
        category: "news".to_string(),
        tags: vec!["touring".to_string()],
        image_url: String::new(),
        published_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
            + chrono::Duration::minutes(n),
        slug: format!("test-article-{n}"),
    }
}

async fn mark_translated(db: &Database, id: ArticleId) {
    let mut article = db.article_by_id(id).await.unwrap().unwrap();
    article.title_translated = format!("Статья {id}");
    article.content_translated = "Переведённый текст статьи.".to_string();
    article.translated_at = Some(Utc::now());
    db.update_article(&article).await.unwrap();
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    // Port 0 = OS assigns a free port
    let mut config = (*config).clone();
    config.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let pipeline = pipeline.clone();
        let config = config.clone();
        async move { start_api_server(pipeline, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_health_endpoint() {
    let (pipeline, config, _dir) = create_test_pipeline().await;
    let app = create_router(pipeline, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_enabled() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    let mut config = (*config).clone();
    config.api.cors_enabled = true;
    let app = create_router(pipeline, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    let mut config = (*config).clone();
    config.api.cors_enabled = false;
    let app = create_router(pipeline, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be absent when CORS is disabled"
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    // Bind to a random available port so parallel tests never collide
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_pipeline = pipeline.clone();
    let server_config = config.clone();
    let server_handle = tokio::spawn(async move {
        let app = create_router(server_pipeline, server_config);
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server_handle.abort();
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let (pipeline, config, _dir) = create_test_pipeline().await;
    let app = create_router(pipeline, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let openapi_version = json["openapi"].as_str().unwrap();
    assert!(openapi_version.starts_with("3."), "Should be OpenAPI 3.x");
    assert_eq!(json["info"]["title"], "newsflow REST API");
    assert!(json["paths"].is_object(), "Should have 'paths' field");
}

#[tokio::test]
async fn test_openapi_spec_served_when_swagger_disabled() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    let mut config = (*config).clone();
    config.api.swagger_ui = false;
    let app = create_router(pipeline, Arc::new(config));

    // The machine-readable spec stays up even without the UI
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "newsflow REST API");
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    let mut config = (*config).clone();
    config.api.swagger_ui = true;
    let app = create_router(pipeline, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible when enabled"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(
        body_str.contains("<html") || body_str.contains("<!DOCTYPE html>"),
        "Response should contain HTML"
    );
    assert!(
        body_str.contains("swagger") || body_str.contains("Swagger"),
        "Response should contain Swagger-related content"
    );
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let (pipeline, config, _dir) = create_test_pipeline().await;

    let mut config = (*config).clone();
    config.api.swagger_ui = false;
    let app = create_router(pipeline, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}

#[tokio::test]
async fn test_openapi_spec_covers_routes() {
    let (pipeline, config, _dir) = create_test_pipeline().await;
    let app = create_router(pipeline, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let paths = json["paths"].as_object().unwrap();
    for expected in [
        "/api/pipeline/ingest",
        "/api/pipeline/translate",
        "/api/pipeline/publish",
        "/api/pipeline/rescrape",
        "/api/pipeline/run",
        "/api/articles",
        "/api/articles/{id}",
        "/api/stats",
        "/api/health",
        "/api-docs/openapi.json",
    ] {
        assert!(paths.contains_key(expected), "spec must document {expected}");
    }

    let schemas = json["components"]["schemas"].as_object().unwrap();
    for expected in ["Article", "RunReport", "StoreStats", "ApiError"] {
        assert!(
            schemas.contains_key(expected),
            "spec must define schema {expected}"
        );
    }

    let tags = json["tags"].as_array().unwrap();
    assert!(!tags.is_empty(), "spec should group operations with tags");
}
