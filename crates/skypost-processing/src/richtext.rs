//! Rich-text link detection.

use regex::Regex;
use skypost_core::models::Facet;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'{}|\\^`\[\]]+"#).expect("valid URL pattern")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Find http(s) URLs in `text` and return one link facet per URL, in order of appearance.
///
/// Trailing sentence punctuation is not part of the link. Offsets are UTF-8 byte offsets,
/// end exclusive.
pub fn parse_facets(text: &str) -> Vec<Facet> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let uri = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if let Err(e) = reqwest::Url::parse(uri) {
                tracing::debug!(uri = %uri, error = %e, "Skipping malformed URL");
                return None;
            }
            Some(Facet::link(m.start(), m.start() + uri.len(), uri))
        })
        .collect()
}

/// URI of the first link facet, if any.
pub fn first_link(facets: &[Facet]) -> Option<&str> {
    facets.iter().find_map(Facet::link_uri)
}
