//! Output module for crawl counters and summaries
//!
//! This module handles:
//! - Counting fetches and writes while a crawl is running
//! - Snapshotting those counts into a final summary
//! - Printing the summary for the user

pub mod stats;

pub use stats::{print_statistics, CrawlCounters, CrawlStatistics};
