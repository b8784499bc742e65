//! Sitemap module: per-page results and their aggregation
//!
//! Workers produce one [`PageResult`] per successfully crawled page and hand
//! it to the [`SitemapAggregator`], whose single writer task merges results
//! into the [`Sitemap`] mapping.

mod aggregator;
mod entry;

pub use aggregator::{AggregatorHandle, SitemapAggregator};
pub use entry::{PageResult, Sitemap, SitemapEntry};
