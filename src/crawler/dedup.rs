//! Claim set shared by all workers
//!
//! Every URL is claimed at most once per crawl. The membership test and the
//! insert happen under one lock acquisition, so two workers racing on the
//! same unclaimed URL can never both win it.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Thread-safe set of canonical URLs already claimed for crawling
#[derive(Debug, Default)]
pub struct DedupSet {
    claimed: Mutex<HashSet<String>>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for crawling
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unclaimed; the caller now owns the right to crawl it
    /// * `false` - Someone already claimed it; the caller must not crawl it
    pub fn try_claim(&self, url: &str) -> bool {
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(url) {
            return false;
        }
        claimed.insert(url.to_string())
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
