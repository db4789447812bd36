//! Utility functions for slug derivation and log-safe text truncation

/// Maximum length of a derived slug, in bytes
const MAX_SLUG_LEN: usize = 80;

/// Maximum length of an HTTP response body embedded in an error message
const MAX_ERROR_BODY_LEN: usize = 500;

/// Derive a URL-safe slug from an article title
///
/// Lowercases ASCII alphanumerics and collapses every other run of characters
/// into a single hyphen. The result never starts or ends with a hyphen and is
/// capped at 80 bytes (re-trimmed so the cap cannot leave a trailing hyphen).
/// Non-ASCII characters are treated as separators, so a fully non-ASCII title
/// produces an empty slug — callers fall back to the article id in that case.
///
/// # Examples
///
/// ```
/// use newsflow::utils::slugify;
///
/// assert_eq!(slugify("New Bike Review: 2026 Model!"), "new-bike-review-2026-model");
/// assert_eq!(slugify("  spaced   out  "), "spaced-out");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        // Slug is ASCII by construction, so byte truncation is char-safe
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Truncate an HTTP response body for inclusion in an error message
///
/// Remote APIs occasionally return multi-kilobyte HTML error pages; embedding
/// those wholesale makes logs unreadable. Cuts at 500 bytes, backing up to the
/// nearest character boundary so multi-byte text is never split.
#[must_use]
pub fn truncate_response_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
