use crate::cache::MAX_TTL_HOURS;
use crate::config::types::{CacheConfig, Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the page budget of a single crawl
pub const MAX_PAGE_BUDGET: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_page_budget(config.max_pages)?;

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a page budget, whether it came from a file or the command line
pub fn validate_page_budget(max_pages: usize) -> Result<(), ConfigError> {
    if max_pages < 1 || max_pages > MAX_PAGE_BUDGET {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGE_BUDGET, max_pages
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.ttl_hours < 1 || config.ttl_hours > MAX_TTL_HOURS {
        return Err(ConfigError::Validation(format!(
            "ttl_hours must be between 1 and {}, got {}",
            MAX_TTL_HOURS, config.ttl_hours
        )));
    }

    if let Some(dir) = &config.directory {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache directory cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
