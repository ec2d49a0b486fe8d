//! URL handling module for html-scraper
//!
//! This module provides URL normalization (the key used for fetching and
//! deduplication) and file-name sanitization (the key used for storage).

mod normalize;
mod sanitize;

// Re-export main functions
pub use normalize::{normalize_parsed, normalize_url};
pub use sanitize::{html_file_name, sanitize_url};

use url::Url;

/// Returns true if the URL uses a scheme the crawler can fetch
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
