//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML parsing and link extraction
//! - Visited-URL tracking and per-page child selection
//! - Level-by-level crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod visited;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, fetch_url, FetchFailure, FetchResult, PageResult, FETCH_TIMEOUT,
    MAX_REDIRECTS, USER_AGENT,
};
pub use frontier::{select_children, Frontier};
pub use parser::{extract_links, LinkExtractor};
pub use visited::VisitedSet;

