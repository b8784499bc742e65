//! Worker pool bookkeeping
//!
//! The pool bounds how many pages are fetched and parsed at once (`size`
//! slots) and counts every dequeued URL as in flight until its task has
//! published its links and result, success or failure.
//!
//! A task gives its slot back before publishing. Tasks suspended on a full
//! frontier or a full sitemap intake are therefore outside the slot bound:
//! each holds one parsed page's links until the queue drains. Their number
//! is limited only by how many pages have been parsed and not yet published.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Decrements the in-flight count when the task holding it ends
#[derive(Debug)]
pub struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fixed-size pool of crawl tasks
pub struct WorkerPool {
    size: usize,
    slots: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    tasks: JoinSet<()>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            slots: Arc::new(Semaphore::new(size)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            tasks: JoinSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Shared slot semaphore, for waiting on a slot without borrowing the pool
    pub fn slots(&self) -> Arc<Semaphore> {
        Arc::clone(&self.slots)
    }

    /// Counts one more task in flight
    ///
    /// Call this synchronously with dequeuing the URL, before any await.
    pub fn begin(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            counter: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn spawn<Fut>(&mut self, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Tasks spawned and not yet reaped
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Reaps the next finished task; None when no tasks remain
    pub async fn join_next(&mut self) -> Option<Result<(), JoinError>> {
        self.tasks.join_next().await
    }

    /// Waits for every spawned task to finish, returning the failures
    pub async fn drain(&mut self) -> Vec<JoinError> {
        let mut failures = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                failures.push(e);
            }
        }
        failures
    }
}
