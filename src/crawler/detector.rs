//! Idle-completion detection
//!
//! No single event says "no more work will ever appear", so completion is
//! detected by sampling: the crawl is done the first time a sample shows no
//! task in flight, nothing queued and no unmerged result.
//!
//! A sample can only be trusted if a dequeued URL is counted as in flight
//! before the dispatch loop can sample again. The coordinator samples from
//! the same loop that dequeues and counts, and workers publish links and
//! results before they stop counting themselves.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Detector state machine: Running until an idle sample, then Done for good
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Running,
    Done,
}

/// One observation of outstanding work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkSample {
    /// Tasks dequeued but not yet finished
    pub in_flight: usize,
    /// URLs waiting in the frontier
    pub pending: usize,
    /// Results submitted to the aggregator but not yet applied
    pub unmerged: usize,
}

impl WorkSample {
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && self.pending == 0 && self.unmerged == 0
    }
}

/// Periodic sampler deciding when the crawl is complete
#[derive(Debug)]
pub struct TerminationDetector {
    ticker: Interval,
    state: DetectorState,
    samples: u64,
}

impl TerminationDetector {
    /// Creates a detector whose first sample is one `period` from now
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            ticker,
            state: DetectorState::Running,
            samples: 0,
        }
    }

    /// Waits until the next sample is due
    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Feeds one sample into the state machine
    pub fn observe(&mut self, sample: WorkSample) -> DetectorState {
        if self.state == DetectorState::Done {
            return DetectorState::Done;
        }

        self.samples += 1;
        tracing::debug!(
            in_flight_urls = sample.in_flight,
            pending_urls = sample.pending,
            unmerged_results = sample.unmerged,
            "Sampled crawl state"
        );

        if sample.is_idle() {
            tracing::info!("No active / pending work left");
            self.state = DetectorState::Done;
        }

        self.state
    }

    /// Number of samples taken while running
    pub fn samples(&self) -> u64 {
        self.samples
    }
}
