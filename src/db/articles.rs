//! Article CRUD and pipeline selection queries.

use crate::error::DatabaseError;
use crate::types::{ArticleId, StoreStats};
use crate::{Error, Result};

use super::{Article, ArticleRow, Database, NewArticle};

/// Column list shared by all article SELECTs
const ARTICLE_COLUMNS: &str = "id, source_url, source_site, title, title_translated, description, \
     content, content_translated, author, category, tags, image_url, \
     published_at, fetched_at, translated_at, published, slug";

impl Database {
    /// Check whether an article with the given source URL already exists
    pub async fn article_exists(&self, source_url: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE source_url = ?")
            .bind(source_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to check article existence: {}",
                    e
                )))
            })?;

        Ok(count > 0)
    }

    /// Insert a new article
    ///
    /// Returns [`DatabaseError::ConstraintViolation`] when an article with the
    /// same source URL already exists; ingestion treats that as "already seen"
    /// and skips the item.
    pub async fn insert_article(&self, article: &NewArticle) -> Result<ArticleId> {
        let tags = serde_json::to_string(&article.tags)?;
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO articles (
                source_url, source_site, title, description, content,
                author, category, tags, image_url, published_at, fetched_at, slug
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.source_url)
        .bind(&article.source_site)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.content)
        .bind(&article.author)
        .bind(&article.category)
        .bind(&tags)
        .bind(&article.image_url)
        .bind(article.published_at.timestamp())
        .bind(now)
        .bind(&article.slug)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Database(DatabaseError::ConstraintViolation(format!(
                    "Article already exists: {}",
                    article.source_url
                )))
            }
            _ => Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert article: {}",
                e
            ))),
        })?;

        Ok(ArticleId::new(result.last_insert_rowid()))
    }

    /// Update an article's mutable columns
    ///
    /// Writes translations, the translation timestamp, publication flag, slug,
    /// and content (content changes on re-extraction). Ingestion-time columns
    /// are never touched.
    pub async fn update_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles SET
                title_translated = ?,
                content_translated = ?,
                translated_at = ?,
                published = ?,
                slug = ?,
                content = ?
            WHERE id = ?
            "#,
        )
        .bind(&article.title_translated)
        .bind(&article.content_translated)
        .bind(article.translated_at.map(|t| t.timestamp()))
        .bind(article.published)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(article.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to update article {}: {}",
                article.id, e
            )))
        })?;

        Ok(())
    }

    /// Get an article by its ID
    pub async fn article_by_id(&self, id: ArticleId) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get article {}: {}",
                id, e
            )))
        })?;

        Ok(row.map(Article::from))
    }

    /// Get an article by its source URL
    pub async fn article_by_url(&self, source_url: &str) -> Result<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE source_url = ?"
        ))
        .bind(source_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get article by URL: {}",
                e
            )))
        })?;

        Ok(row.map(Article::from))
    }

    /// Articles with extracted content but no translation yet, newest first
    ///
    /// Articles with empty content are excluded; they carry nothing to
    /// translate until a re-extraction pass fills them in.
    pub async fn untranslated_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE content != '' AND content_translated = ''
            ORDER BY published_at DESC
            LIMIT ?
            "#
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get untranslated articles: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Translated articles not yet published, newest first
    pub async fn unpublished_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE content_translated != '' AND published = 0
            ORDER BY published_at DESC
            LIMIT ?
            "#
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get unpublished articles: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// All published articles, newest first
    ///
    /// Feeds the archive index page, which lists the whole site.
    pub async fn published_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE published = 1
            ORDER BY published_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get published articles: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Articles whose content extraction came up empty, newest first
    pub async fn empty_content_articles(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE content = ''
            ORDER BY fetched_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get empty-content articles: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Most recently ingested articles
    pub async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            ORDER BY fetched_at DESC
            LIMIT ?
            "#
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get recent articles: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Mark a batch of articles as published
    ///
    /// Called only after the whole batch has durably landed on the site, so a
    /// failed publication leaves every flag untouched.
    pub async fn mark_published(&self, ids: &[ArticleId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        // SQLite default SQLITE_MAX_VARIABLE_NUMBER is 999.
        const MAX_IDS_PER_BATCH: usize = 500;

        for chunk in ids.chunks(MAX_IDS_PER_BATCH) {
            let mut query_builder =
                sqlx::QueryBuilder::new("UPDATE articles SET published = 1 WHERE id IN (");

            let mut first = true;
            for id in chunk {
                if !first {
                    query_builder.push(", ");
                }
                query_builder.push_bind(*id);
                first = false;
            }
            query_builder.push(")");

            let query = query_builder.build();
            query.execute(&self.pool).await.map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to mark articles published: {}",
                    e
                )))
            })?;
        }

        Ok(())
    }

    /// Store-wide counts: total, translated, published
    pub async fn stats(&self) -> Result<StoreStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count articles: {}",
                    e
                )))
            })?;

        let translated: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE content_translated != ''")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to count translated articles: {}",
                        e
                    )))
                })?;

        let published: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE published = 1")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to count published articles: {}",
                        e
                    )))
                })?;

        Ok(StoreStats {
            total,
            translated,
            published,
        })
    }
}
