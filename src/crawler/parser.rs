//! HTML inspection for keyword matching and link extraction
//!
//! This module handles:
//! - Case-insensitive keyword search over raw page HTML
//! - Extracting in-scope links from `<a href>` tags

use crate::url::BaseOrigin;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Returns true if `keyword` occurs in `html`, ignoring case
///
/// The search runs over the raw document text, markup included.
pub fn contains_keyword(html: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }
    html.to_lowercase().contains(&keyword.to_lowercase())
}

/// Extracts the frontier batch of a page
///
/// Every `<a href>` value is resolved against `origin`; links that fail to
/// resolve or fall outside it are dropped, and duplicates are removed keeping
/// first-seen order.
///
/// # Example
///
/// ```
/// use sumi_seek::crawler::extract_links;
/// use sumi_seek::url::BaseOrigin;
///
/// let origin = BaseOrigin::parse("https://example.com").unwrap();
/// let html = r#"<a href="/b">B</a><a href="/a">A</a><a href="/b">B again</a>"#;
/// assert_eq!(
///     extract_links(html, &origin),
///     vec!["https://example.com/b", "https://example.com/a"]
/// );
/// ```
pub fn extract_links(html: &str, origin: &BaseOrigin) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(url) = origin.scoped(href) {
                if seen.insert(url.clone()) {
                    links.push(url);
                }
            }
        }
    }

    links
}
