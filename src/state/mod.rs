//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: where the orchestrator is in the level-by-level traversal

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
