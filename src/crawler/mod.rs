//! Crawler module for concurrent page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The claim set that keeps every URL to a single fetch
//! - The bounded frontier queue and the worker pool draining it
//! - HTTP fetching with retry logic
//! - HTML parsing and link/asset extraction
//! - Idle-completion detection and overall crawl coordination

mod coordinator;
mod dedup;
mod detector;
mod fetcher;
mod frontier;
mod parser;
mod pool;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use dedup::DedupSet;
pub use detector::{DetectorState, TerminationDetector, WorkSample};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{frontier, FrontierClosed, FrontierReceiver, FrontierSender, WorkItem};
pub use parser::{extract_assets, extract_links, parse_page, ParsedPage};
pub use pool::{InFlightGuard, WorkerPool};
