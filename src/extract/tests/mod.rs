//! Tests for article content extraction

use chrono::Utc;
use serde_json::json;

use crate::db::{Article, NewArticle};
use crate::extract::*;
use crate::types::ArticleId;

fn sample_article() -> Article {
    Article {
        id: ArticleId::new(1),
        source_url: "https://example.com/articles/1".to_string(),
        source_site: "Example Moto".to_string(),
        title: "Sample title".to_string(),
        title_translated: String::new(),
        description: "Sample description".to_string(),
        content: "Existing body.".to_string(),
        content_translated: String::new(),
        author: "A. Rider".to_string(),
        category: "Touring".to_string(),
        tags: vec!["touring".to_string()],
        image_url: String::new(),
        published_at: Utc::now(),
        fetched_at: Utc::now(),
        translated_at: None,
        published: false,
        slug: "sample-title".to_string(),
    }
}

fn structured_page(data: &serde_json::Value) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{data}</script></head>
<body><div class="postBody"><p>Fallback paragraph that should not be used.</p></div></body></html>"#
    )
}

#[test]
fn test_extract_prefers_structured_data() {
    let data = json!({
        "@type": "NewsArticle",
        "articleBody": "The updated roadster gets a stiffer frame and new electronics.\nEarly rides suggest the changes work.",
        "articleSection": "Reviews",
        "image": "https://example.com/lead.jpg",
        "keywords": ["Ducati", "Electric Motorcycles", "Panigale", "Ducati"]
    });

    let extracted = extract(&structured_page(&data));

    assert_eq!(
        extracted.content,
        "The updated roadster gets a stiffer frame and new electronics.\n\nEarly rides suggest the changes work."
    );
    assert_eq!(extracted.category, "Reviews");
    assert_eq!(extracted.image_url, "https://example.com/lead.jpg");
    assert_eq!(extracted.tags, vec!["Ducati", "Panigale"]);
}

#[test]
fn test_structured_image_array_and_keyword_string() {
    let data = json!({
        "articleBody": "A single paragraph body with a period at the end.",
        "image": ["https://example.com/first.jpg", "https://example.com/second.jpg"],
        "keywords": "touring, , racing,  luggage "
    });

    let extracted = extract(&structured_page(&data));

    assert_eq!(extracted.image_url, "https://example.com/first.jpg");
    assert_eq!(extracted.tags, vec!["touring", "luggage"]);
}

#[test]
fn test_malformed_structured_block_skipped() {
    let page = r#"<html><head>
<script type="application/ld+json">{not valid json</script>
<script type="application/ld+json">{"articleBody": "Real content from the second block. It parses."}</script>
</head></html>"#;

    let extracted = extract(page);

    assert_eq!(
        extracted.content,
        "Real content from the second block. It parses."
    );
}

#[test]
fn test_structured_block_without_body_falls_back_to_html() {
    let page = r#"<html><head>
<script type="application/ld+json">{"@type": "BreadcrumbList", "itemListElement": []}</script>
</head>
<body><div class="postBody">
<p>The fallback path still finds this paragraph.</p>
<p>Subscribe to our newsletter</p>
<p>And this second real paragraph survives the filter.</p>
</div></body></html>"#;

    let extracted = extract(page);

    assert_eq!(
        extracted.content,
        "The fallback path still finds this paragraph.\n\nAnd this second real paragraph survives the filter."
    );
}

#[test]
fn test_clean_drops_standalone_boilerplate_paragraph() {
    let body = "The recall covers 12,000 bikes built between March and June.\nSubscribe to our newsletter\nDealers will replace the part free of charge.";

    assert_eq!(
        clean_article_body(body),
        "The recall covers 12,000 bikes built between March and June.\n\nDealers will replace the part free of charge."
    );
}

#[test]
fn test_clean_strips_trailing_teaser_titles() {
    let body = "Production starts next spring, with deliveries expected by summer.\nFive Bikes We Loved This Year\nWhy The New Model Matters";

    assert_eq!(
        clean_article_body(body),
        "Production starts next spring, with deliveries expected by summer."
    );
}

#[test]
fn test_clean_keeps_final_paragraph_with_period() {
    let body = "The price holds steady for 2026.\nDeliveries begin in March.";

    assert_eq!(
        clean_article_body(body),
        "The price holds steady for 2026.\n\nDeliveries begin in March."
    );
}

#[test]
fn test_clean_drops_related_section_headers() {
    let body = "The prototype keeps the stock swingarm.\nMore Fun Off Road\nRecommended For You\nMore stories from the paddock\n- The RideApart Team\nTesting resumes in January.";

    assert_eq!(
        clean_article_body(body),
        "The prototype keeps the stock swingarm.\n\nTesting resumes in January."
    );
}

#[test]
fn test_boilerplate_requires_short_paragraph() {
    let long = "The company announced the change in its quarterly newsletter, pointing to rising component costs and a packed launch calendar, and confirmed that existing orders will be honored at the original price regardless of delivery date.";

    assert!(long.len() >= 200);
    assert!(!is_boilerplate(long));
    assert!(is_boilerplate("Sign up for updates"));
    assert!(is_boilerplate("Got a tip for us? Email tips@example.com"));
}

#[test]
fn test_generic_tag_denylist() {
    assert!(is_generic_tag("Electric Motorcycles"));
    assert!(is_generic_tag("electric motorcycles"));
    assert!(!is_generic_tag("Review of the XYZ 2026"));

    let data = json!({
        "articleBody": "Body text long enough to count as an article. It has a period.",
        "keywords": ["Electric Motorcycles", "Review of the XYZ 2026"]
    });

    let extracted = extract(&structured_page(&data));

    assert_eq!(extracted.tags, vec!["Review of the XYZ 2026"]);
}

#[test]
fn test_fallback_selector_order() {
    let page = r#"<html><body>
<div class="article-body">
<p>Paragraph from the article body container.</p>
</div>
<main><p>A main paragraph that is long enough to pass the direct length filter.</p></main>
</body></html>"#;

    let extracted = extract(page);

    assert_eq!(extracted.content, "Paragraph from the article body container.");
}

#[test]
fn test_direct_selector_requires_long_paragraphs() {
    let page = r#"<html><body><main>
<p>Menu</p>
<p>This paragraph crosses the fifty character minimum for direct matches.</p>
</main></body></html>"#;

    let extracted = extract(page);

    assert_eq!(
        extracted.content,
        "This paragraph crosses the fifty character minimum for direct matches."
    );
}

#[test]
fn test_fallback_image_and_tag_links() {
    let page = r#"<html><head>
<meta property="og:image" content="" />
<meta property="og:image" content="https://example.com/cover.jpg" />
</head><body>
<div class="postBody"><p>Enough body text to extract from the primary container.</p></div>
<a href="/tag/touring">Touring</a>
<a href="/category/gear">Gear</a>
<a href="/tag/touring">Touring</a>
<span class="tag">Long-term test</span>
<a href="/tag/deep">An extremely long tag label that should be rejected for length reasons</a>
</body></html>"#;

    let extracted = extract(page);

    assert_eq!(extracted.image_url, "https://example.com/cover.jpg");
    assert_eq!(extracted.tags, vec!["Touring", "Gear", "Long-term test"]);
    assert_eq!(extracted.category, "");
}

#[test]
fn test_extract_empty_or_unrecognized_page() {
    assert_eq!(extract(""), Extracted::default());
    assert_eq!(
        extract("<html><body><p>Hi</p></body></html>"),
        Extracted::default()
    );
}

#[test]
fn test_merge_preserves_existing_metadata() {
    let extracted = Extracted {
        content: "  Fresh body from re-extraction.  ".to_string(),
        image_url: "https://example.com/new.jpg".to_string(),
        category: "Adventure".to_string(),
        tags: vec!["replacement".to_string()],
    };

    let mut article = sample_article();
    article.content = String::new();
    article.image_url = "https://example.com/original.jpg".to_string();
    article.category = String::new();

    extracted.merge_into(&mut article);

    assert_eq!(article.content, "Fresh body from re-extraction.");
    assert_eq!(article.image_url, "https://example.com/original.jpg");
    assert_eq!(article.category, "Adventure");
    assert_eq!(article.tags, vec!["touring"]);
}

#[test]
fn test_merge_empty_extraction_is_noop() {
    let mut article = sample_article();
    let before = article.clone();

    Extracted::default().merge_into(&mut article);

    assert_eq!(article, before);
}

#[test]
fn test_merge_fills_missing_fields_on_ingest() {
    let extracted = Extracted {
        content: "Scraped body.".to_string(),
        image_url: "https://example.com/scraped.jpg".to_string(),
        category: "Racing".to_string(),
        tags: vec!["superbike".to_string()],
    };

    let mut article = NewArticle {
        source_url: "https://example.com/articles/2".to_string(),
        source_site: "Example Moto".to_string(),
        title: "Scraped title".to_string(),
        description: String::new(),
        content: String::new(),
        author: String::new(),
        category: String::new(),
        tags: Vec::new(),
        image_url: String::new(),
        published_at: Utc::now(),
        slug: "scraped-title".to_string(),
    };

    extracted.merge_into_new(&mut article);

    assert_eq!(article.content, "Scraped body.");
    assert_eq!(article.image_url, "https://example.com/scraped.jpg");
    assert_eq!(article.category, "Racing");
    assert_eq!(article.tags, vec!["superbike"]);
}

#[test]
fn test_repeated_merge_converges() {
    let data = json!({
        "articleBody": "Extraction of the same page is stable. Running it again changes nothing.",
        "articleSection": "Touring",
        "image": "https://example.com/stable.jpg",
        "keywords": ["stability"]
    });
    let page = structured_page(&data);

    let mut article = sample_article();
    extract(&page).merge_into(&mut article);
    let after_first = article.clone();

    extract(&page).merge_into(&mut article);

    assert_eq!(article, after_first);
}
