//! Configuration module for html-scraper
//!
//! Configuration comes from an optional TOML file layered under
//! command-line values, and is validated before any crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use html_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```
//!
//! # File format
//!
//! ```toml
//! [crawler]
//! root-url = "https://example.com/"
//! max-depth = 2
//! max-width = 8
//! unique-urls-only = true
//!
//! [output]
//! directory = "./scraped_data"
//!
//! [http]
//! ignore-ssl-verification = false
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigOverrides, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_OUTPUT_DIR,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, resolve_config};
pub use validation::validate;
