use super::is_http_scheme;
use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the form used for fetching and deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Parsing alone lowercases the host, resolves dot segments and turns an
/// empty path into `/`. Query strings and trailing slashes are kept as-is,
/// since they may address different documents.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or the URL cannot be fetched
///
/// # Examples
///
/// ```
/// use html_scraper::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Applies the normalization rules to an already parsed URL
pub fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);

    Ok(url)
}
