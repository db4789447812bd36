//! Article store handlers.

use super::ArticlesQuery;
use crate::api::ApiState;
use crate::db::Article;
use crate::error::Error;
use crate::types::ArticleId;
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// GET /api/articles - Most recently fetched articles
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum number of articles to return (default: 20, max: 100)")
    ),
    responses(
        (status = 200, description = "Articles ordered by fetch time, newest first", body = Vec<Article>),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn list_articles(
    State(state): State<ApiState>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<Vec<Article>>, Error> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    match state.pipeline.recent_articles(limit).await {
        Ok(articles) => Ok(Json(articles)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list articles");
            Err(e)
        }
    }
}

/// GET /api/articles/:id - Single article by id
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    tag = "articles",
    params(
        ("id" = i64, Path, description = "Article id")
    ),
    responses(
        (status = 200, description = "The article", body = Article),
        (status = 404, description = "No article with this id", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn get_article(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, Error> {
    match state.pipeline.article(ArticleId::new(id)).await {
        Ok(Some(article)) => Ok(Json(article)),
        Ok(None) => Err(Error::NotFound(format!("article {id}"))),
        Err(e) => {
            tracing::error!(error = %e, article_id = id, "Failed to load article");
            Err(e)
        }
    }
}
