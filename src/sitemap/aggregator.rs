//! Single-writer sitemap aggregator
//!
//! Workers submit results through a bounded intake channel; one writer task
//! owns every mutation of the sitemap. Submitting only waits for intake
//! capacity, never for the merge itself.

use crate::sitemap::entry::{PageResult, Sitemap, SitemapEntry};
use crate::CrawlError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cloneable submission handle given to every worker
#[derive(Debug, Clone)]
pub struct AggregatorHandle {
    intake: mpsc::Sender<PageResult>,
    unmerged: Arc<AtomicUsize>,
}

impl AggregatorHandle {
    /// Submits a result for merging
    ///
    /// Suspends only while the intake channel is full. The result counts as
    /// unmerged from before it enters the channel until the writer has applied
    /// it, so [`AggregatorHandle::unmerged`] never reports a gap.
    pub async fn add_result(
        &self,
        result: PageResult,
    ) -> Result<(), mpsc::error::SendError<PageResult>> {
        self.unmerged.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.intake.send(result).await {
            self.unmerged.fetch_sub(1, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// Results submitted but not yet applied to the sitemap
    pub fn unmerged(&self) -> usize {
        self.unmerged.load(Ordering::SeqCst)
    }
}

/// Owner of the sitemap and its writer task
pub struct SitemapAggregator {
    handle: AggregatorHandle,
    sitemap: Arc<RwLock<Sitemap>>,
    writer: JoinHandle<()>,
}

impl SitemapAggregator {
    /// Starts the writer task with an intake channel of `buffer` slots
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(buffer: usize) -> Self {
        let (intake, receiver) = mpsc::channel(buffer.max(1));
        let unmerged = Arc::new(AtomicUsize::new(0));
        let sitemap = Arc::new(RwLock::new(Sitemap::new()));

        let writer = tokio::spawn(run_writer(
            receiver,
            Arc::clone(&sitemap),
            Arc::clone(&unmerged),
        ));

        Self {
            handle: AggregatorHandle { intake, unmerged },
            sitemap,
            writer,
        }
    }

    /// Returns a new submission handle
    pub fn handle(&self) -> AggregatorHandle {
        self.handle.clone()
    }

    /// Submits a result through the aggregator's own handle
    pub async fn add_result(
        &self,
        result: PageResult,
    ) -> Result<(), mpsc::error::SendError<PageResult>> {
        self.handle.add_result(result).await
    }

    /// Results submitted but not yet applied
    pub fn unmerged(&self) -> usize {
        self.handle.unmerged()
    }

    /// Current entry for `url`; empty if no result has been applied yet
    pub fn info_for(&self, url: &str) -> SitemapEntry {
        self.sitemap
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info_for(url)
    }

    /// Closes the intake, waits for every submitted result to be applied and
    /// returns the final sitemap
    ///
    /// Handles cloned out to workers keep the intake open, so they must all
    /// be dropped before this resolves.
    pub async fn finish(self) -> Result<Sitemap, CrawlError> {
        let SitemapAggregator {
            handle,
            sitemap,
            writer,
        } = self;
        drop(handle);

        writer
            .await
            .map_err(|e| CrawlError::WorkerPanicked(format!("sitemap writer: {}", e)))?;

        let mut guard = sitemap.write().unwrap_or_else(PoisonError::into_inner);
        let sitemap = std::mem::take(&mut *guard);
        tracing::debug!("Sitemap writer stopped after {} merges", sitemap.merged_results());
        Ok(sitemap)
    }
}

async fn run_writer(
    mut intake: mpsc::Receiver<PageResult>,
    sitemap: Arc<RwLock<Sitemap>>,
    unmerged: Arc<AtomicUsize>,
) {
    while let Some(result) = intake.recv().await {
        tracing::debug!(
            "Updating sitemap for url={}, links={}, assets={}",
            result.source_url,
            result.outgoing_links.len(),
            result.assets.len()
        );

        sitemap
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(result);

        // Only after the merge is visible
        unmerged.fetch_sub(1, Ordering::SeqCst);
    }
}
