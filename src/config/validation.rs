use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.frontier_capacity < 1 {
        return Err(ConfigError::Validation(
            "frontier-capacity must be >= 1".to_string(),
        ));
    }

    if config.pool_size < 1 || config.pool_size > 1024 {
        return Err(ConfigError::Validation(format!(
            "pool-size must be between 1 and 1024, got {}",
            config.pool_size
        )));
    }

    if config.sample_interval_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "sample-interval-ms must be >= 10ms, got {}ms",
            config.sample_interval_ms
        )));
    }

    if config.result_buffer < 1 {
        return Err(ConfigError::Validation(
            "result-buffer must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_frontier_capacity() {
        let mut config = Config::default();
        config.crawler.frontier_capacity = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_pool_size_bounds() {
        let mut config = Config::default();
        config.crawler.pool_size = 0;
        assert!(validate(&config).is_err());

        config.crawler.pool_size = 1025;
        assert!(validate(&config).is_err());

        config.crawler.pool_size = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_sample_interval_too_short() {
        let mut config = Config::default();
        config.crawler.sample_interval_ms = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_result_buffer() {
        let mut config = Config::default();
        config.crawler.result_buffer = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeouts() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.http.connect_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_too_many_retries() {
        let mut config = Config::default();
        config.http.max_retries = 11;
        assert!(validate(&config).is_err());
    }
}
