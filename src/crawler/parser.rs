//! HTML link extraction
//!
//! Extraction is a plain function so the coordinator can be handed a
//! different strategy with the same signature.

use crate::url::normalize_parsed;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Signature shared by every link extraction strategy
///
/// Takes the page HTML and the URL it was fetched from, and returns absolute
/// `http`/`https` URLs.
pub type LinkExtractor = fn(&str, &Url) -> Vec<String>;

/// Extracts outbound links from `<a href>` elements
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Absolute `http://` and `https://` hrefs
/// - Protocol-relative hrefs (`//host/path`), given the base URL's scheme
/// - Root-relative hrefs (`/path`), given the base URL's scheme and host
///
/// **Exclude:**
/// - Path-relative hrefs (`page.html`, `../up`)
/// - Fragment-only hrefs (`#section`)
/// - Any other scheme (`mailto:`, `javascript:`, `tel:`, `ftp:`, ...)
/// - Anything that does not parse as a URL with a host
///
/// Fragments are stripped and duplicates collapsed; the first occurrence
/// keeps its position, so results follow document order.
///
/// # Example
///
/// ```
/// use html_scraper::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="mailto:x@example.com">Mail</a>"#;
/// let base = Url::parse("https://example.com/index").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/about"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves an href to a normalized absolute URL
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    let resolved = if href.starts_with('/') {
        // Covers both "//host/path" and "/path"
        base_url.join(href).ok()?
    } else if has_http_prefix(href) {
        Url::parse(href).ok()?
    } else {
        return None;
    };

    normalize_parsed(resolved).ok().map(String::from)
}

fn has_http_prefix(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
