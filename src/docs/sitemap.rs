//! Keyword search over a sitemap's `<loc>` entries.

use super::SearchResult;
use scraper::{Html, Selector};

/// Upper bound on sitemap matches returned for one query.
pub(crate) const MAX_SITEMAP_RESULTS: usize = 10;

/// Extract every `<loc>` URL from sitemap XML.
pub(crate) fn extract_locations(xml: &str) -> Vec<String> {
    // The HTML parser keeps unknown elements, which is all a sitemap needs.
    let document = Html::parse_document(xml);
    let selector = Selector::parse("loc").expect("valid loc selector");
    document
        .select(&selector)
        .map(|loc| loc.text().collect::<String>().trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Keep URLs whose lowercased path contains any lowercased query keyword.
pub(crate) fn match_locations(locations: &[String], query: &str) -> Vec<SearchResult> {
    let keywords: Vec<String> = query
        .split_whitespace()
        .map(|kw| kw.to_lowercase())
        .collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    locations
        .iter()
        .filter(|url| {
            let path = url_path(url).to_lowercase();
            keywords.iter().any(|kw| path.contains(kw.as_str()))
        })
        .take(MAX_SITEMAP_RESULTS)
        .map(|url| SearchResult {
            title: title_from_url(url),
            url: url.clone(),
            snippet: None,
        })
        .collect()
}

/// Path portion of an absolute URL (everything after the host).
fn url_path(url: &str) -> &str {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    after_scheme
        .find('/')
        .map_or("", |slash| &after_scheme[slash..])
}

/// Human title from the last non-empty path segment.
fn title_from_url(url: &str) -> String {
    let segment = url
        .split('/')
        .filter(|part| !part.is_empty())
        .next_back()
        .unwrap_or(url);
    let spaced = segment.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
