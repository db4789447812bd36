//! Feed and article-page fixtures served from wiremock

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// RSS 2.0 feed with `count` items linking to `/articles/{n}` pages
pub fn rss_feed(server_uri: &str, count: usize) -> String {
    let mut items = String::new();
    for n in 1..=count {
        items.push_str(&format!(
            r#"    <item>
      <title>Test Article {n}</title>
      <link>{server_uri}/articles/{n}</link>
      <description>Summary {n}</description>
      <pubDate>Mon, 02 Jun 2025 10:0{n}:00 GMT</pubDate>
    </item>
"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test News</title>
    <link>{server_uri}/</link>
    <description>Test feed</description>
{items}  </channel>
</rss>"#
    )
}

/// Article page carrying its body in a JSON-LD NewsArticle block
pub fn article_page(body: &str) -> String {
    let data = json!({
        "@type": "NewsArticle",
        "articleBody": body,
        "articleSection": "news",
        "image": "https://cdn.example.com/lead.jpg",
        "keywords": ["touring"],
    });
    format!(
        r#"<html><head><script type="application/ld+json">{data}</script></head><body></body></html>"#
    )
}

/// Serve the feed under `/feed.xml`
pub async fn mount_feed(server: &MockServer, count: usize) {
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_feed(&server.uri(), count)))
        .mount(server)
        .await;
}

/// Serve one article page under `/articles/{n}`
pub async fn mount_article_page(server: &MockServer, n: usize, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/articles/{n}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page(body)))
        .mount(server)
        .await;
}

/// Mount a LibreTranslate mock answering every request with `translated`
pub async fn mount_libretranslate(server: &MockServer, translated: &str) {
    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"translatedText": translated})),
        )
        .mount(server)
        .await;
}
