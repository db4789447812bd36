//! Assertions over the published site working copy

use newsflow::Config;

/// Read a published file relative to the site repository root
pub fn published_file(config: &Config, relative: &str) -> String {
    let path = config.site.repo_path.join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing published file {}: {e}", path.display()))
}

/// Assert a published file exists and contains the needle
pub fn assert_published_contains(config: &Config, relative: &str, needle: &str) {
    let content = published_file(config, relative);
    assert!(
        content.contains(needle),
        "{relative} should contain {needle:?}, got:\n{content}"
    );
}
