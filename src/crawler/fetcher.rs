//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (timeout, redirect limit, TLS verification)
//! - GET requests to fetch page content
//! - Error classification
//!
//! A failed fetch is an ordinary outcome, never an error: callers get a
//! `FetchResult` either way.

use crate::config::HttpConfig;
use crate::url::is_http_scheme;
use reqwest::{header::LOCATION, redirect::Policy, Client};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fixed per-request timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Why a fetch produced no content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailure {
    /// Connection refused, DNS failure, reset, or a broken response body
    Connect,
    /// No response within the request timeout
    Timeout,
    /// Redirect chain exceeded the hop limit
    TooManyRedirects,
    /// URL could not be parsed or uses an unsupported scheme
    InvalidUrl,
    /// URL has no scheme (e.g. `example.com/page`)
    MissingScheme,
    /// Server redirected to a `Location` that could not be parsed
    UnparsableLocation,
    /// TLS handshake or certificate verification failed
    Tls,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::Connect => "connection error",
            Self::Timeout => "read timeout",
            Self::TooManyRedirects => "too many redirects",
            Self::InvalidUrl => "invalid URL",
            Self::MissingScheme => "missing URL scheme",
            Self::UnparsableLocation => "unparsable redirect location",
            Self::Tls => "TLS failure",
        };
        f.write_str(description)
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Server answered; any HTTP status counts
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Raw response body, shared between the writer and the extractor
        body: Arc<[u8]>,
    },

    /// No content could be retrieved
    Failed(FetchFailure),
}

/// Outcome of fetching one URL at one depth
#[derive(Debug, Clone)]
pub struct PageResult {
    pub url: String,
    pub depth: u32,
    pub result: FetchResult,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use html_scraper::config::HttpConfig;
/// use html_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .use_rustls_tls()
        .danger_accept_invalid_certs(config.ignore_ssl_verification)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Failure Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | No scheme | MissingScheme |
/// | Unparsable URL / non-HTTP scheme | InvalidUrl |
/// | Request timeout | Timeout |
/// | Redirect chain > 10 | TooManyRedirects |
/// | 3xx with a Location the client could not follow | UnparsableLocation |
/// | Certificate / TLS handshake error | Tls |
/// | Connection refused, reset, body read error | Connect |
///
/// Any other response, including 4xx and 5xx, is a success carrying the
/// response body. Nothing is retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return FetchResult::Failed(FetchFailure::MissingScheme)
        }
        Err(_) => return FetchResult::Failed(FetchFailure::InvalidUrl),
    };

    if !is_http_scheme(&parsed) {
        return FetchResult::Failed(FetchFailure::InvalidUrl);
    }

    let response = match client.get(parsed).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::trace!("Request error for {}: {:?}", url, e);
            return FetchResult::Failed(classify_error(&e));
        }
    };

    let status = response.status();

    // The client follows every redirect it can parse; one left over means the
    // Location header was unusable.
    if status.is_redirection() && response.headers().contains_key(LOCATION) {
        return FetchResult::Failed(FetchFailure::UnparsableLocation);
    }

    let final_url = response.url().to_string();

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body: Arc::from(&body[..]),
        },
        Err(e) => FetchResult::Failed(classify_error(&e)),
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_builder() {
        FetchFailure::InvalidUrl
    } else if is_tls_error(error) {
        FetchFailure::Tls
    } else {
        FetchFailure::Connect
    }
}

/// Walks the source chain looking for a rustls handshake or certificate error
fn is_tls_error(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if is_rustls_error(err) {
            return true;
        }
        source = err.source();
    }
    false
}

/// Matches a rustls error, including one wrapped in (nested) `io::Error`s
///
/// `io::Error::source` skips the wrapped error, so it has to be unwrapped
/// with `get_ref` instead.
fn is_rustls_error(err: &(dyn StdError + 'static)) -> bool {
    if err.is::<rustls::Error>() {
        return true;
    }
    match err.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
        Some(inner) => is_rustls_error(inner),
        None => false,
    }
}
