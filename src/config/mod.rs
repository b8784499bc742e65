//! Configuration module for Sitemap-Ripple
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a crawl can run without
//! any file at all.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_pool_size, Config, CrawlerConfig, HttpConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
