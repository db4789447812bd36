//! Pass coordination: ingest, translate, publish, re-extract.
//!
//! [`NewsPipeline`] owns every component (feed client, page fetcher,
//! translator, publisher, database) and runs the passes sequentially. Each
//! pass absorbs per-item failures into its report so one bad article never
//! stalls the rest; a failed publication batch aborts as a whole and is
//! retried on the next cycle.

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::{Article, Database, NewArticle};
use crate::error::DatabaseError;
use crate::extract::{Extracted, extract};
use crate::feeds::{FeedClient, FeedItem};
use crate::publish::{PublishFile, Publisher, create_publisher};
use crate::render::{article_path, index_path, render_article, render_month_index};
use crate::scrape::PageFetcher;
use crate::translate::{Translator, create_translator};
use crate::types::{
    ArticleId, IngestReport, PublishReport, RescrapeReport, RunReport, StoreStats, TranslateReport,
};
use crate::utils::slugify;
use crate::{Error, Result};

/// Title of the generated archive index page
const INDEX_TITLE: &str = "Архив";

/// Owns the pipeline components and runs the passes
pub struct NewsPipeline {
    config: Config,
    db: Database,
    feeds: FeedClient,
    fetcher: PageFetcher,
    translator: Box<dyn Translator>,
    publisher: Box<dyn Publisher>,
}

impl NewsPipeline {
    /// Assemble the pipeline from configuration
    ///
    /// The translator connection is probed once; an unreachable backend is
    /// logged but not fatal, since passes report per-item errors when it
    /// stays down.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be constructed or the
    /// configured publisher repository spec is invalid.
    pub async fn new(config: Config, db: Database) -> Result<Self> {
        let feeds = FeedClient::new()?;
        let fetcher = PageFetcher::new()?;

        let translator = create_translator(&config.translator)?;
        if let Err(e) = translator.check_connection().await {
            warn!("Translator {} is not reachable: {}", translator.name(), e);
        }

        let publisher = create_publisher(&config)?;
        info!("Publishing strategy: {}", publisher.name());

        Ok(Self {
            config,
            db,
            feeds,
            fetcher,
            translator,
            publisher,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Direct access to the article store
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Ingest pass: poll every enabled source and store new articles
    ///
    /// Articles whose URL is already stored are skipped. Extraction failures
    /// are absorbed: the article is stored with feed metadata and empty
    /// content, and a later re-extraction pass retries it.
    ///
    /// # Errors
    ///
    /// Feed and per-item failures are absorbed into the report's error
    /// count rather than aborting the pass.
    pub async fn ingest(&self) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for source in self.config.enabled_sources() {
            for feed_url in &source.feeds {
                let items = match self.feeds.fetch_feed(feed_url).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!("Failed to fetch feed {}: {}", feed_url, e);
                        report.errors += 1;
                        continue;
                    }
                };
                debug!("Feed {} returned {} items", feed_url, items.len());

                for item in items {
                    let inserted = self.ingest_item(&source.name, item, &mut report).await;
                    // Pace page fetches so source sites see at most one
                    // download per delay interval
                    if inserted {
                        sleep(self.config.pipeline.item_delay).await;
                    }
                }
            }
        }

        info!(
            "Ingest pass done: {} new, {} skipped, {} errors",
            report.ingested, report.skipped, report.errors
        );
        Ok(report)
    }

    /// Store one feed item; returns whether a new row was inserted
    async fn ingest_item(&self, site: &str, item: FeedItem, report: &mut IngestReport) -> bool {
        match self.db.article_exists(&item.source_url).await {
            Ok(true) => {
                report.skipped += 1;
                return false;
            }
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to check {}: {}", item.source_url, e);
                report.errors += 1;
                return false;
            }
        }

        let mut article = NewArticle {
            source_url: item.source_url,
            source_site: site.to_string(),
            title: item.title,
            description: item.description,
            content: String::new(),
            author: item.author,
            category: item.category,
            tags: item.tags,
            image_url: item.image_url,
            published_at: item.published_at,
            slug: String::new(),
        };
        article.slug = slugify(&article.title);

        match self.fetch_and_extract(&article.source_url).await {
            Ok(extracted) => extracted.merge_into_new(&mut article),
            Err(e) => {
                // Stored with feed metadata only; rescrape retries later
                warn!("Failed to extract {}: {}", article.source_url, e);
            }
        }

        match self.db.insert_article(&article).await {
            Ok(id) => {
                debug!("Stored article {} from {}", id, article.source_url);
                report.ingested += 1;
                true
            }
            Err(Error::Database(DatabaseError::ConstraintViolation(_))) => {
                report.skipped += 1;
                false
            }
            Err(e) => {
                warn!("Failed to store {}: {}", article.source_url, e);
                report.errors += 1;
                false
            }
        }
    }

    async fn fetch_and_extract(&self, url: &str) -> Result<Extracted> {
        let page = self.fetcher.fetch_page(url).await?;
        Ok(extract(&page))
    }

    /// Translation pass: translate up to `limit` pending articles
    ///
    /// Title and body must both translate before anything is stored; a
    /// failed article keeps no partial translation and is picked up again
    /// on the next pass.
    ///
    /// # Errors
    ///
    /// Returns an error when the pending selection cannot be loaded;
    /// per-article failures are absorbed into the report.
    pub async fn translate(&self, limit: usize) -> Result<TranslateReport> {
        let articles = self.db.untranslated_articles(limit).await?;
        let mut report = TranslateReport {
            selected: articles.len(),
            ..Default::default()
        };
        if articles.is_empty() {
            debug!("No articles waiting for translation");
            return Ok(report);
        }

        info!(
            "Translating {} articles with {}",
            articles.len(),
            self.translator.name()
        );
        for mut article in articles {
            let title_translated = if article.title.is_empty() {
                String::new()
            } else {
                match self.translator.translate_title(&article.title).await {
                    Ok(title) => title,
                    Err(e) => {
                        warn!("Failed to translate title of {}: {}", article.source_url, e);
                        report.errors += 1;
                        continue;
                    }
                }
            };

            let content_translated = match self.translator.translate(&article.content).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to translate {}: {}", article.source_url, e);
                    report.errors += 1;
                    continue;
                }
            };

            article.title_translated = title_translated;
            article.content_translated = content_translated;
            article.translated_at = Some(Utc::now());
            if let Err(e) = self.db.update_article(&article).await {
                warn!("Failed to store translation of {}: {}", article.source_url, e);
                report.errors += 1;
                continue;
            }
            report.translated += 1;
            debug!("Translated {}", article.source_url);
        }

        info!(
            "Translated {} of {} articles ({} errors)",
            report.translated, report.selected, report.errors
        );
        Ok(report)
    }

    /// Publication pass: land up to `limit` translated articles
    ///
    /// The batch goes out as one commit together with the regenerated
    /// archive index. Articles are marked published only after the
    /// publisher confirms the commit, so a failed batch leaves every
    /// article unmarked and the next pass retries it.
    ///
    /// # Errors
    ///
    /// Returns an error when the batch cannot be landed; in that case no
    /// article is marked published.
    pub async fn publish(&self, limit: usize) -> Result<PublishReport> {
        let articles = self.db.unpublished_articles(limit).await?;
        let mut report = PublishReport {
            selected: articles.len(),
            ..Default::default()
        };
        if articles.is_empty() {
            debug!("No articles waiting for publication");
            return Ok(report);
        }

        info!(
            "Publishing {} articles via {}",
            articles.len(),
            self.publisher.name()
        );
        let files = self.render_batch(&articles).await?;
        let message = format!("Add {} new articles", articles.len());
        self.publisher.publish_batch(&files, &message).await?;

        let ids: Vec<ArticleId> = articles.iter().map(|a| a.id).collect();
        self.db.mark_published(&ids).await?;
        report.published = articles.len();

        info!("Published {} articles", report.published);
        Ok(report)
    }

    /// Render the batch plus the regenerated archive index
    async fn render_batch(&self, articles: &[Article]) -> Result<Vec<PublishFile>> {
        let content_dir = &self.config.site.content_dir;
        let mut files: Vec<PublishFile> = articles
            .iter()
            .map(|article| {
                PublishFile::new(article_path(article, content_dir), render_article(article))
            })
            .collect();

        // The index covers everything already live plus this batch
        let mut indexed = self.db.published_articles().await?;
        indexed.extend(articles.iter().cloned());
        indexed.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        files.push(PublishFile::new(
            index_path(content_dir),
            render_month_index(&indexed, INDEX_TITLE),
        ));

        Ok(files)
    }

    /// Re-extraction pass: retry articles stored with empty content
    ///
    /// # Errors
    ///
    /// Returns an error when the selection cannot be loaded; per-article
    /// failures are absorbed into the report.
    pub async fn rescrape(&self) -> Result<RescrapeReport> {
        let articles = self.db.empty_content_articles().await?;
        let mut report = RescrapeReport {
            selected: articles.len(),
            ..Default::default()
        };
        if articles.is_empty() {
            debug!("No articles with empty content");
            return Ok(report);
        }

        info!("Re-extracting {} articles with empty content", articles.len());
        for mut article in articles {
            let extracted = match self.fetch_and_extract(&article.source_url).await {
                Ok(extracted) => extracted,
                Err(e) => {
                    warn!("Failed to re-extract {}: {}", article.source_url, e);
                    report.errors += 1;
                    continue;
                }
            };
            extracted.merge_into(&mut article);
            if article.content.is_empty() {
                debug!("Still no content for {}", article.source_url);
                report.errors += 1;
                continue;
            }
            if article.slug.is_empty() {
                article.slug = slugify(&article.title);
            }
            if let Err(e) = self.db.update_article(&article).await {
                warn!("Failed to store re-extracted {}: {}", article.source_url, e);
                report.errors += 1;
                continue;
            }
            report.updated += 1;
            sleep(self.config.pipeline.item_delay).await;
        }

        info!(
            "Re-extracted {} of {} articles ({} errors)",
            report.updated, report.selected, report.errors
        );
        Ok(report)
    }

    /// Full cycle: ingest, then translate, then publish
    ///
    /// Pass failures are logged and absorbed so one broken stage does not
    /// stop the others from running on schedule.
    pub async fn run(&self) -> RunReport {
        info!("Pipeline cycle starting");
        let ingest = match self.ingest().await {
            Ok(report) => report,
            Err(e) => {
                warn!("Ingest pass failed: {}", e);
                IngestReport::default()
            }
        };
        let translate = match self.translate(self.config.pipeline.translate_batch).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Translation pass failed: {}", e);
                TranslateReport::default()
            }
        };
        let publish = match self.publish(self.config.pipeline.publish_batch).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Publication pass failed: {}", e);
                PublishReport::default()
            }
        };
        info!("Pipeline cycle complete");
        RunReport {
            ingest,
            translate,
            publish,
        }
    }

    /// Store statistics
    ///
    /// # Errors
    ///
    /// Returns an error when the counts cannot be queried.
    pub async fn stats(&self) -> Result<StoreStats> {
        self.db.stats().await
    }

    /// Most recently ingested articles
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.db.recent_articles(limit).await
    }

    /// Fetch one article by id
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn article(&self, id: ArticleId) -> Result<Option<Article>> {
        self.db.article_by_id(id).await
    }
}
