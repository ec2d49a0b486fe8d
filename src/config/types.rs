use serde::Deserialize;
use std::path::PathBuf;

/// Default directory pages are written under
pub const DEFAULT_OUTPUT_DIR: &str = "./scraped_data";

/// Main configuration structure for html-scraper
///
/// Built once before a crawl starts and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (depth 0)
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum number of link hops from the root URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum links taken from a single page; `None` means unbounded
    #[serde(rename = "max-width", default)]
    pub max_width: Option<usize>,

    /// Never fetch the same URL twice across the whole crawl
    #[serde(rename = "unique-urls-only", default)]
    pub unique_urls_only: bool,

    /// Optional cap on in-flight fetches within one level
    #[serde(rename = "max-concurrent-fetches", default)]
    pub max_concurrent_fetches: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives `{depth}/{file}.html`
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Accept invalid TLS certificates
    #[serde(rename = "ignore-ssl-verification", default)]
    pub ignore_ssl_verification: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Values supplied on the command line
///
/// Every field is optional so the same struct can either layer over a
/// config file or build a configuration on its own.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_url: Option<String>,
    pub max_depth: Option<u32>,
    pub max_width: Option<usize>,
    pub unique_urls_only: bool,
    pub output_dir: Option<PathBuf>,
    pub ignore_ssl_verification: bool,
    pub max_concurrent_fetches: Option<usize>,
}

impl ConfigOverrides {
    /// Applies these overrides on top of a loaded configuration
    ///
    /// Boolean flags can only switch a setting on, never off.
    pub fn apply(self, config: &mut Config) {
        if let Some(root_url) = self.root_url {
            config.crawler.root_url = root_url;
        }
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = max_depth;
        }
        if self.max_width.is_some() {
            config.crawler.max_width = self.max_width;
        }
        if self.unique_urls_only {
            config.crawler.unique_urls_only = true;
        }
        if let Some(output_dir) = self.output_dir {
            config.output.directory = output_dir;
        }
        if self.ignore_ssl_verification {
            config.http.ignore_ssl_verification = true;
        }
        if self.max_concurrent_fetches.is_some() {
            config.crawler.max_concurrent_fetches = self.max_concurrent_fetches;
        }
    }

    /// Builds a configuration from command-line values alone
    pub fn into_config(self) -> Result<Config, crate::ConfigError> {
        let root_url = self
            .root_url
            .ok_or(crate::ConfigError::MissingField("root URL"))?;
        let max_depth = self
            .max_depth
            .ok_or(crate::ConfigError::MissingField("level (max depth)"))?;

        Ok(Config {
            crawler: CrawlerConfig {
                root_url,
                max_depth,
                max_width: self.max_width,
                unique_urls_only: self.unique_urls_only,
                max_concurrent_fetches: self.max_concurrent_fetches,
            },
            output: OutputConfig {
                directory: self.output_dir.unwrap_or_else(default_output_dir),
            },
            http: HttpConfig {
                ignore_ssl_verification: self.ignore_ssl_verification,
            },
        })
    }
}
