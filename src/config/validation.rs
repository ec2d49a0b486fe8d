use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_root_url(&config.root_url)?;

    // max_depth and max_width are unsigned, so only the fetch cap needs a range check
    if config.max_concurrent_fetches == Some(0) {
        return Err(ConfigError::Validation(
            "max_concurrent_fetches must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the root URL: absolute, http(s), with a host
fn validate_root_url(root_url: &str) -> Result<(), ConfigError> {
    if root_url.trim().is_empty() {
        return Err(ConfigError::InvalidUrl("root URL cannot be empty".to_string()));
    }

    normalize_url(root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}' is not a valid URL: {}", root_url, e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
