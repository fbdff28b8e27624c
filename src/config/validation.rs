use crate::config::types::{Config, CrawlerConfig, FilterEntry, OutputConfig, SiteConfig};
use crate::output::FilterPattern;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_crawler_config(&config.crawler)?;
    validate_filters(&config.filters)?;
    Ok(())
}

/// Validates the host and seed URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::Validation(
            "host cannot be empty (e.g. host = \"www.example.com\")".to_string(),
        ));
    }

    if config.host.contains('/') {
        return Err(ConfigError::Validation(format!(
            "host must be a bare host name without scheme or path, got '{}'",
            config.host
        )));
    }

    if config.entry.is_empty() {
        return Err(ConfigError::Validation(
            "entry cannot be empty (e.g. entry = \"https://www.example.com/\")".to_string(),
        ));
    }

    // The seed must declare its scheme; it becomes the scheme of every
    // resolved link.
    if !config.entry.contains("://") {
        return Err(ConfigError::InvalidUrl(format!(
            "entry '{}' must include an http or https scheme",
            config.entry
        )));
    }

    let url = Url::parse(&config.entry).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid entry URL '{}': {}", config.entry, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "entry '{}' must use the http or https scheme",
            config.entry
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.filename.is_empty() {
        return Err(ConfigError::Validation(
            "output filename cannot be empty".to_string(),
        ));
    }

    if config.filename.contains('/') || config.filename.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "output filename must not contain path separators, got '{}'",
            config.filename
        )));
    }

    Ok(())
}

/// Validates crawler timing configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.min_loop_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "min-loop-interval must be >= 1ms, got {}ms",
            config.min_loop_interval
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates filters by compiling each one
fn validate_filters(filters: &[FilterEntry]) -> Result<(), ConfigError> {
    for entry in filters {
        if let FilterEntry::Contains(text) = entry {
            if text.is_empty() {
                return Err(ConfigError::InvalidPattern(
                    "contains filter cannot be empty".to_string(),
                ));
            }
        }
        FilterPattern::compile(entry)?;
    }
    Ok(())
}
