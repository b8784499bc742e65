//! Sitemap-Ripple: a concurrent single-host sitemap crawler
//!
//! This crate crawls every same-host page reachable from a seed URL, records
//! the outgoing links and assets of each page, and renders the result as an
//! indented sitemap tree.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Frontier queue closed")]
    FrontierClosed,

    #[error("Crawl task panicked: {0}")]
    WorkerPanicked(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid target host: {0}")]
    InvalidHost(String),
}

/// Per-URL fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Redirect from {url} leaves the target host: {location}")]
    OffHostRedirect { url: String, location: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Per-URL parse failures
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlReport};
pub use sitemap::{PageResult, Sitemap, SitemapEntry};
pub use url::{resolve_url, same_host, seed_url_for_host};
