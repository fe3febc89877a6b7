use crate::config::types::{Config, CrawlerConfig, EndpointConfig, QueryConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_endpoint_config(&config.endpoint)?;
    validate_crawler_config(&config.crawler)?;
    validate_query_config(&config.query)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates endpoint and proxy settings
fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    if config.host.is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation("port must be non-zero".to_string()));
    }

    if config.scheme != "http" && config.scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "scheme must be http or https, got '{}'",
            config.scheme
        )));
    }

    // The endpoint must form a valid base URL for the fetcher
    Url::parse(&config.base_url())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if let Some(proxy) = config.proxy_url() {
        let url = Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

        if !matches!(url.scheme(), "socks5" | "socks5h" | "http") {
            return Err(ConfigError::Validation(format!(
                "proxy scheme must be socks5, socks5h or http, got '{}'",
                url.scheme()
            )));
        }
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_in_flight < 1 || config.max_in_flight > 64 {
        return Err(ConfigError::Validation(format!(
            "max_in_flight must be between 1 and 64, got {}",
            config.max_in_flight
        )));
    }

    Ok(())
}

/// Validates the request templates
fn validate_query_config(config: &QueryConfig) -> Result<(), ConfigError> {
    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search_path must start with '/', got '{}'",
            config.search_path
        )));
    }

    if config.fragment_delimiter.is_empty() {
        return Err(ConfigError::Validation(
            "fragment_delimiter cannot be empty".to_string(),
        ));
    }

    // A '/' delimiter would swallow literal page paths
    if config.fragment_delimiter.contains('/') {
        return Err(ConfigError::Validation(
            "fragment_delimiter cannot contain '/'".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every configured selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for selector in [
        &config.pagination,
        &config.current_page,
        &config.page_link,
        &config.disabled,
        &config.no_results,
        &config.total,
        &config.result,
        &config.result_url,
        &config.result_title,
        &config.result_snippet,
    ] {
        compile_selector(selector)?;
    }

    if config.previous_label.trim().is_empty() || config.next_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "navigation labels cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Compiles a CSS selector, mapping failures to a config error
pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
