//! Bounded frontier queue of URLs awaiting a fetch slot
//!
//! Producers suspend while the queue is full rather than dropping links.
//! Only URLs that won a claim in the [`DedupSet`](super::DedupSet) are pushed,
//! so every popped item is novel.

use tokio::sync::mpsc;

/// A claimed URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: String,
}

/// Returned when pushing after the receiving side has gone away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierClosed(pub String);

/// Creates a FIFO frontier with room for `capacity` pending URLs
pub fn frontier(capacity: usize) -> (FrontierSender, FrontierReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (FrontierSender { tx }, FrontierReceiver { rx })
}

/// Producer side, cloned into every worker
#[derive(Debug, Clone)]
pub struct FrontierSender {
    tx: mpsc::Sender<WorkItem>,
}

impl FrontierSender {
    /// Appends a URL, suspending while the queue is at capacity
    pub async fn push(&self, url: String) -> Result<(), FrontierClosed> {
        self.tx
            .send(WorkItem { url })
            .await
            .map_err(|e| FrontierClosed(e.0.url))
    }

    /// Number of URLs currently queued
    ///
    /// Slots reserved by a producer that is mid-push count as queued.
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// Consumer side, owned by the dispatch loop
#[derive(Debug)]
pub struct FrontierReceiver {
    rx: mpsc::Receiver<WorkItem>,
}

impl FrontierReceiver {
    /// Removes the next URL, suspending until one is available
    ///
    /// Returns None once every sender has been dropped and the queue is empty.
    /// Cancel safe: an item is never lost if the returned future is dropped.
    pub async fn pop(&mut self) -> Option<WorkItem> {
        self.rx.recv().await
    }
}
