use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sitemap-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
}

/// Crawl engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of discovered URLs waiting for a worker slot
    pub frontier_capacity: usize,

    /// Number of concurrent fetch slots
    pub pool_size: usize,

    /// How often the termination detector samples pool and queue state (milliseconds)
    pub sample_interval_ms: u64,

    /// Capacity of the sitemap aggregator's intake channel
    pub result_buffer: usize,
}

impl CrawlerConfig {
    /// Returns the sampling interval as a Duration
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            frontier_capacity: 512,
            pool_size: default_pool_size(),
            sample_interval_ms: 5_000,
            result_buffer: 512,
        }
    }
}

/// Four fetch slots per available core
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 4
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Extra attempts for 5xx responses and timeouts (0 disables retry)
    pub max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sitemap-ripple/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 500,
        }
    }
}
