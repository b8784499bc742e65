//! Output module for rendering crawl results
//!
//! This module handles:
//! - Rendering the aggregated sitemap as an indented tree
//! - Recording and reporting crawl statistics

pub mod stats;
mod tree;

pub use stats::{format_statistics, log_statistics, CrawlCounters, CrawlStatistics};
pub use tree::{format_sitemap, render_sitemap, SitemapView};
