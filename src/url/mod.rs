//! URL handling module for Sitemap-Ripple
//!
//! This module provides the stateless URL utilities the crawl engine relies on:
//! resolving hrefs against a page URL, comparing hosts, and turning the
//! command-line target into a seed URL.

mod host;
mod resolve;

// Re-export main functions
pub use host::{extract_domain, same_host, seed_url_for_host};
pub use resolve::resolve_url;
