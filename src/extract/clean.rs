//! Body cleaning and text classification helpers.

/// Boilerplate paragraphs must be shorter than this to count as boilerplate;
/// a long paragraph that merely mentions a newsletter is real content.
const BOILERPLATE_MAX_LEN: usize = 200;

/// Trailing paragraphs under this length with no sentence-ending period are
/// treated as related-article teaser titles and stripped.
const TEASER_MAX_LEN: usize = 120;

/// Short section headers and sign-offs are only dropped under this length
const SECTION_HEADER_MAX_LEN: usize = 50;

/// Marketing/legal phrases that mark a short paragraph as boilerplate
/// (case-insensitive substring match)
const BOILERPLATE_PHRASES: [&str; 17] = [
    "subscribe",
    "newsletter",
    "sign up",
    "follow us",
    "share this",
    "advertisement",
    "sponsored",
    "cookie",
    "privacy policy",
    "terms of service",
    "all rights reserved",
    "for more info",
    "stay informed",
    "we want your opinion",
    "what would you like to see on",
    "the rideapart team",
    "got a tip for us",
];

/// Generic site-wide taxonomy terms rejected from per-article tags
/// (case-insensitive exact match)
const GENERIC_TAGS: [&str; 25] = [
    "electric motorcycles",
    "industry",
    "adventure & dual-sport",
    "racing",
    "gear news",
    "technology",
    "reviews",
    "hunting",
    "gear",
    "products & services",
    "positions",
    "experiences",
    "travel",
    "rants",
    "explainers",
    "data deep dives",
    "standard & naked",
    "off road",
    "pwcs",
    "real racers",
    "news",
    "motogp",
    "utv",
    "motorcycle culture",
    "recalls",
];

/// Section headers that mark the start of related-content blocks
const RELATED_HEADERS: [&str; 2] = ["more fun off road", "recommended for you"];

/// Check whether a paragraph is boilerplate
///
/// A paragraph is boilerplate when it is short and contains any known
/// marketing/legal phrase.
pub fn is_boilerplate(text: &str) -> bool {
    if text.len() >= BOILERPLATE_MAX_LEN {
        return false;
    }
    let lower = text.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Check whether a keyword is a generic site-wide taxonomy term
pub fn is_generic_tag(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    GENERIC_TAGS.iter().any(|generic| *generic == lower)
}

/// Clean a structured-data article body
///
/// Splits into paragraphs and drops blanks, boilerplate, related-content
/// section headers, and staff sign-off list items; then strips trailing
/// paragraphs that look like related-article teaser titles (short, no
/// period), working backward until a real paragraph is found.
pub fn clean_article_body(body: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();

    for paragraph in body.lines() {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if is_boilerplate(paragraph) {
            continue;
        }

        let lower = paragraph.to_lowercase();
        if RELATED_HEADERS.contains(&lower.as_str())
            || (lower.starts_with("more ") && paragraph.len() < SECTION_HEADER_MAX_LEN)
        {
            continue;
        }

        // List items like "- The RideApart Team"
        if paragraph.starts_with("- The ") && paragraph.len() < SECTION_HEADER_MAX_LEN {
            continue;
        }

        cleaned.push(paragraph);
    }

    // Strip trailing related-article teaser titles
    while cleaned.len() > 1 {
        let last = cleaned[cleaned.len() - 1];
        if last.len() < TEASER_MAX_LEN && !last.contains('.') {
            cleaned.pop();
        } else {
            break;
        }
    }

    cleaned.join("\n\n")
}

/// Deduplicate tags, keeping the first occurrence of each
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
