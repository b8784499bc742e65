use std::collections::{BTreeSet, HashMap};

/// Links and assets extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The page the result was extracted from
    pub source_url: String,

    /// Same-host pages the page links to
    pub outgoing_links: BTreeSet<String>,

    /// Images, scripts and stylesheets referenced by the page
    pub assets: BTreeSet<String>,
}

impl PageResult {
    /// Builds a result from any iterables of URL strings
    pub fn new<L, A>(source_url: impl Into<String>, links: L, assets: A) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            source_url: source_url.into(),
            outgoing_links: links.into_iter().map(Into::into).collect(),
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }
}

/// The aggregated record of one URL's links and assets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntry {
    pub url: String,
    pub outgoing_links: BTreeSet<String>,
    pub assets: BTreeSet<String>,
}

impl SitemapEntry {
    /// An entry with no links and no assets
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns true if nothing has been recorded for this URL
    pub fn is_empty(&self) -> bool {
        self.outgoing_links.is_empty() && self.assets.is_empty()
    }

    fn absorb(&mut self, result: PageResult) {
        self.outgoing_links.extend(result.outgoing_links);
        self.assets.extend(result.assets);
    }
}

/// Mapping from canonical URL to its sitemap entry
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    entries: HashMap<String, SitemapEntry>,
    merged: usize,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a page result into the mapping
    ///
    /// A second result for the same URL is unioned into the existing entry;
    /// nothing already recorded is ever overwritten or dropped.
    pub fn merge(&mut self, result: PageResult) {
        self.entries
            .entry(result.source_url.clone())
            .or_insert_with(|| SitemapEntry::empty(result.source_url.clone()))
            .absorb(result);
        self.merged += 1;
    }

    /// Returns the entry for `url`, or an empty entry if nothing was recorded
    pub fn info_for(&self, url: &str) -> SitemapEntry {
        self.get(url)
            .cloned()
            .unwrap_or_else(|| SitemapEntry::empty(url))
    }

    /// Borrowing lookup, None if the URL has no recorded result
    pub fn get(&self, url: &str) -> Option<&SitemapEntry> {
        self.entries.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of pages with a recorded result
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page results applied so far, duplicates included
    pub fn merged_results(&self) -> usize {
        self.merged
    }

    /// Total outgoing links across all entries
    pub fn link_count(&self) -> usize {
        self.entries.values().map(|e| e.outgoing_links.len()).sum()
    }

    /// Total assets across all entries
    pub fn asset_count(&self) -> usize {
        self.entries.values().map(|e| e.assets.len()).sum()
    }
}
