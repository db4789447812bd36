//! Hugo markdown rendering for publication.
//!
//! Turns stored articles into Hugo-compatible markdown pages with YAML front
//! matter, and builds the archive index page. Rendering is pure; publishers
//! decide where the rendered files land.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::db::Article;

/// Hugo front matter lists at most this many tags per article
const MAX_FRONT_MATTER_TAGS: usize = 5;

/// Render an article as a Hugo markdown page
///
/// Uses the translated title and body when present, falling back to the
/// originals. The front matter always carries the site's base category;
/// author and cover blocks appear only when the article has them.
#[must_use]
pub fn render_article(article: &Article) -> String {
    let title = display_title(article);
    let escaped_title = title.replace('"', "\\\"");

    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("title: \"{}\"\n", escaped_title));
    out.push_str(&format!(
        "date: {}\n",
        article.published_at.format("%Y-%m-%dT%H:%M:%S")
    ));

    out.push_str("categories:\n");
    out.push_str("  - Новости\n");
    if !article.category.is_empty() {
        out.push_str(&format!("  - {}\n", translate_category(&article.category)));
    }

    if !article.tags.is_empty() {
        out.push_str("tags:\n");
        for tag in article.tags.iter().take(MAX_FRONT_MATTER_TAGS) {
            out.push_str(&format!("  - {}\n", tag));
        }
    }

    out.push_str(&format!("source: {}\n", article.source_url));
    if !article.author.is_empty() {
        out.push_str(&format!("author: {}\n", article.author));
    }

    if !article.image_url.is_empty() {
        out.push_str("cover:\n");
        out.push_str(&format!("  image: \"{}\"\n", article.image_url));
        out.push_str(&format!("  alt: \"{}\"\n", escaped_title));
        out.push_str("  hidden: false\n");
    }

    out.push_str("---\n\n");

    // No leading heading; Hugo renders the title from the front matter
    let body = if article.content_translated.is_empty() {
        &article.content
    } else {
        &article.content_translated
    };
    out.push_str(&normalize_paragraphs(body));
    out.push_str("\n\n");

    out.push_str("---\n\n");
    out.push_str(&format!(
        "*Источник: [{}]({})*\n",
        article.source_site, article.source_url
    ));

    out
}

/// Relative path of an article's page under the content directory
///
/// Pages are laid out as `posts/YYYY/MM/slug.md`; articles without a slug
/// fall back to their database id. Always uses forward slashes so the same
/// path works for the commit API and local files.
#[must_use]
pub fn article_path(article: &Article, content_dir: &str) -> String {
    format!(
        "{}/posts/{}/{}.md",
        content_dir.trim_end_matches('/'),
        article.published_at.format("%Y/%m"),
        file_stem(article),
    )
}

/// Relative path of the archive index page under the content directory
#[must_use]
pub fn index_path(content_dir: &str) -> String {
    format!("{}/posts/index.md", content_dir.trim_end_matches('/'))
}

/// Render the archive index page
///
/// Groups articles by publication month, newest month first, with links
/// relative to the posts directory. Entries keep their input order within
/// each month.
#[must_use]
pub fn render_month_index(articles: &[Article], title: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", title));

    let mut by_month: BTreeMap<(i32, u32), Vec<&Article>> = BTreeMap::new();
    for article in articles {
        let key = (article.published_at.year(), article.published_at.month());
        by_month.entry(key).or_default().push(article);
    }

    for ((year, month), group) in by_month.iter().rev() {
        out.push_str(&format!("## {}\n\n", month_heading(*year, *month)));

        for article in group {
            out.push_str(&format!(
                "- [{}]({}/{:02}/{}.md)\n",
                display_title(article),
                year,
                month,
                file_stem(article),
            ));
        }
        out.push('\n');
    }

    out
}

fn display_title(article: &Article) -> &str {
    if article.title_translated.is_empty() {
        &article.title
    } else {
        &article.title_translated
    }
}

fn file_stem(article: &Article) -> String {
    if article.slug.is_empty() {
        format!("article-{}", article.id)
    } else {
        article.slug.clone()
    }
}

fn month_heading(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date.format("%B %Y").to_string(),
        None => format!("{}-{:02}", year, month),
    }
}

/// Collapse stray blank paragraphs and surrounding whitespace
fn normalize_paragraphs(content: &str) -> String {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Map well-known source categories to the site's Russian names
///
/// Unknown categories pass through unchanged.
fn translate_category(category: &str) -> String {
    let translated = match category.to_lowercase().as_str() {
        "news" => "Новости",
        "reviews" => "Обзоры",
        "features" => "Статьи",
        "sportbikes" => "Спортбайки",
        "cruisers" => "Круизеры",
        "adventure" => "Эндуро",
        "touring" => "Туринг",
        "naked" => "Нейкеды",
        "electric" => "Электромотоциклы",
        "racing" => "Гонки",
        "gear" => "Экипировка",
        "technology" => "Технологии",
        "industry" => "Индустрия",
        "custom" => "Кастом",
        "adventure-and-dual-sport" => "Эндуро",
        "touring-and-sport-touring" => "Туринг",
        "standard-and-naked" => "Нейкеды",
        "electric-motorcycles" => "Электромотоциклы",
        _ => return category.to_string(),
    };
    translated.to_string()
}
