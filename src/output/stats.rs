//! Crawl statistics
//!
//! Workers bump shared atomic counters as they go; once the crawl is over the
//! counters and the final sitemap are folded into a [`CrawlStatistics`]
//! snapshot for reporting.

use crate::sitemap::Sitemap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Live counters shared by every worker task
#[derive(Debug, Default)]
pub struct CrawlCounters {
    claimed: AtomicUsize,
    crawled: AtomicUsize,
    failed: AtomicUsize,
}

impl CrawlCounters {
    /// A URL won its claim and was queued
    pub fn record_claim(&self) {
        self.claimed.fetch_add(1, Ordering::Relaxed);
    }

    /// A page produced a result
    pub fn record_crawled(&self) {
        self.crawled.fetch_add(1, Ordering::Relaxed);
    }

    /// A page failed to fetch or parse
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn claimed(&self) -> usize {
        self.claimed.load(Ordering::Relaxed)
    }

    pub fn crawled(&self) -> usize {
        self.crawled.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// URLs claimed for crawling, seed included
    pub urls_claimed: usize,

    /// Pages fetched, parsed and submitted to the sitemap
    pub pages_crawled: usize,

    /// Pages that failed to fetch or parse
    pub pages_failed: usize,

    /// Page results applied to the sitemap by its writer
    pub results_merged: usize,

    /// Entries in the final sitemap
    pub sitemap_pages: usize,

    /// Outgoing links across all entries
    pub total_links: usize,

    /// Assets across all entries
    pub total_assets: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Snapshots the counters against the final sitemap
    pub fn collect(counters: &CrawlCounters, sitemap: &Sitemap, elapsed: Duration) -> Self {
        Self {
            urls_claimed: counters.claimed(),
            pages_crawled: counters.crawled(),
            pages_failed: counters.failed(),
            results_merged: sitemap.merged_results(),
            sitemap_pages: sitemap.len(),
            total_links: sitemap.link_count(),
            total_assets: sitemap.asset_count(),
            elapsed,
        }
    }

    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_crawled as f64 / secs
        } else {
            0.0
        }
    }

    /// Percentage of attempted pages that succeeded
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_crawled + self.pages_failed;
        if attempted > 0 {
            (self.pages_crawled as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Formats statistics as a plain-text block
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut text = String::new();

    text.push_str("=== Crawl Statistics ===\n");
    text.push_str(&format!("URLs claimed: {}\n", stats.urls_claimed));
    text.push_str(&format!("Pages crawled: {}\n", stats.pages_crawled));
    text.push_str(&format!("Pages failed: {}\n", stats.pages_failed));
    text.push_str(&format!("Results merged: {}\n", stats.results_merged));
    text.push_str(&format!("Sitemap pages: {}\n", stats.sitemap_pages));
    text.push_str(&format!("Total links: {}\n", stats.total_links));
    text.push_str(&format!("Total assets: {}\n", stats.total_assets));
    text.push_str(&format!(
        "Elapsed: {:.2}s ({:.2} pages/sec)\n",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    ));
    text.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages)\n",
        stats.success_rate(),
        stats.pages_crawled,
        stats.pages_crawled + stats.pages_failed
    ));

    text
}

/// Logs statistics at info level
pub fn log_statistics(stats: &CrawlStatistics) {
    for line in format_statistics(stats).lines() {
        tracing::info!("{}", line);
    }
}
