//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the dispatch loop that coordinates the crawl:
//! - Seeding the frontier with the claimed root URL
//! - Moving frontier URLs into pool slots
//! - Sampling pool, frontier and aggregator state for completion
//! - Draining workers and the aggregator on shutdown
//!
//! Each worker task fetches and parses one page while holding a pool slot,
//! then releases the slot before publishing its links and result. A worker
//! suspended on a full frontier therefore never holds a slot the dispatch
//! loop needs in order to drain that frontier.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::dedup::DedupSet;
use crate::crawler::detector::{DetectorState, TerminationDetector, WorkSample};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{frontier, FrontierReceiver, FrontierSender, WorkItem};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::crawler::pool::{InFlightGuard, WorkerPool};
use crate::output::{CrawlCounters, CrawlStatistics};
use crate::sitemap::{AggregatorHandle, PageResult, Sitemap, SitemapAggregator};
use crate::url::{extract_domain, same_host, seed_url_for_host};
use crate::{ConfigError, CrawlError, FetchError, ParseError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Seed URL the crawl started from; the root of the sitemap tree
    pub root: String,
    pub sitemap: Sitemap,
    pub statistics: CrawlStatistics,
}

/// Shared state handed to every worker task
struct WorkerContext<F> {
    fetcher: Arc<F>,
    target_host: String,
    dedup: Arc<DedupSet>,
    frontier: FrontierSender,
    aggregator: AggregatorHandle,
    counters: Arc<CrawlCounters>,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    config: CrawlerConfig,
    fetcher: Arc<F>,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator that fetches pages through `fetcher`
    pub fn new(config: CrawlerConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
        }
    }

    /// Crawls every same-host page reachable from `seed`
    ///
    /// This method:
    /// 1. Claims the seed and pushes it onto the frontier
    /// 2. Dispatches frontier URLs into pool slots
    /// 3. Samples outstanding work until the detector declares the crawl done
    /// 4. Waits for all tasks, then drains the aggregator
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The final sitemap and crawl statistics
    /// * `Err(CrawlError)` - The seed has no host or a crawl component failed
    pub async fn run(&self, seed: Url) -> Result<CrawlReport, CrawlError> {
        let target_host = extract_domain(&seed)
            .ok_or_else(|| ConfigError::InvalidHost(format!("{} has no host", seed)))?;
        let root = seed.to_string();
        let start_time = Instant::now();

        let dedup = Arc::new(DedupSet::new());
        let counters = Arc::new(CrawlCounters::default());
        let (frontier_tx, mut frontier_rx) = frontier(self.config.frontier_capacity);
        let aggregator = SitemapAggregator::start(self.config.result_buffer);
        let mut pool = WorkerPool::new(self.config.pool_size);

        let context = Arc::new(WorkerContext {
            fetcher: Arc::clone(&self.fetcher),
            target_host,
            dedup: Arc::clone(&dedup),
            frontier: frontier_tx.clone(),
            aggregator: aggregator.handle(),
            counters: Arc::clone(&counters),
        });

        tracing::info!(
            "Starting to crawl {} with {} workers (frontier capacity {})",
            root,
            pool.size(),
            frontier_tx.capacity()
        );

        if dedup.try_claim(&root) {
            counters.record_claim();
        }
        frontier_tx
            .push(root.clone())
            .await
            .map_err(|_| CrawlError::FrontierClosed)?;

        self.dispatch(&mut pool, &mut frontier_rx, &frontier_tx, &aggregator, &context)
            .await;

        // Done: nothing new gets dispatched, finish whatever is left
        tracing::debug!("Waiting for {} finished tasks to be reaped", pool.len());
        for failure in pool.drain().await {
            tracing::error!("Crawl task failed: {}", failure);
        }
        drop(context);
        drop(frontier_tx);
        drop(frontier_rx);

        let sitemap = aggregator.finish().await?;
        let statistics = CrawlStatistics::collect(&counters, &sitemap, start_time.elapsed());

        tracing::info!(
            "Crawl completed: {} of {} claimed URLs crawled, {} failed in {:?}",
            statistics.pages_crawled,
            dedup.len(),
            statistics.pages_failed,
            statistics.elapsed
        );

        Ok(CrawlReport {
            root,
            sitemap,
            statistics,
        })
    }

    /// Runs the dispatch loop until the detector reports completion
    async fn dispatch(
        &self,
        pool: &mut WorkerPool,
        frontier_rx: &mut FrontierReceiver,
        frontier_tx: &FrontierSender,
        aggregator: &SitemapAggregator,
        context: &Arc<WorkerContext<F>>,
    ) {
        let mut detector = TerminationDetector::new(self.config.sample_interval());
        let slots = pool.slots();

        loop {
            tokio::select! {
                biased;

                _ = detector.tick() => {
                    // Sampled on the loop that dequeues, so a popped URL is
                    // always already counted in flight here
                    let sample = WorkSample {
                        in_flight: pool.in_flight(),
                        pending: frontier_tx.depth(),
                        unmerged: aggregator.unmerged(),
                    };
                    if detector.observe(sample) == DetectorState::Done {
                        tracing::debug!("Crawl idle after {} samples", detector.samples());
                        break;
                    }
                }

                Some(joined) = pool.join_next(), if !pool.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!("Crawl task failed: {}", e);
                    }
                }

                next = next_job(&slots, frontier_rx) => {
                    let Some((slot, item)) = next else {
                        tracing::warn!("Frontier closed before the crawl completed");
                        break;
                    };
                    let in_flight = pool.begin();
                    tracing::debug!("Enqueuing url={}", item.url);
                    pool.spawn(crawl_page(Arc::clone(context), item, slot, in_flight));
                }
            }
        }
    }
}

/// Waits for a free slot, then for a frontier URL
///
/// Cancel safe: dropping the future releases a held slot and never loses a URL.
async fn next_job(
    slots: &Arc<Semaphore>,
    frontier: &mut FrontierReceiver,
) -> Option<(OwnedSemaphorePermit, WorkItem)> {
    let slot = Arc::clone(slots).acquire_owned().await.ok()?;
    let item = frontier.pop().await?;
    Some((slot, item))
}

/// Processes one claimed URL
///
/// Failures are logged and counted; they end this URL's processing only.
async fn crawl_page<F: Fetcher>(
    context: Arc<WorkerContext<F>>,
    item: WorkItem,
    slot: OwnedSemaphorePermit,
    _in_flight: InFlightGuard,
) {
    let url = item.url;

    let parsed = match fetch_and_parse(&context, &url).await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", url, e);
            context.counters.record_failure();
            return;
        }
    };
    drop(slot);

    for link in &parsed.links {
        if !context.dedup.try_claim(link) {
            tracing::trace!("Already claimed: {}", link);
            continue;
        }
        context.counters.record_claim();
        if let Err(closed) = context.frontier.push(link.clone()).await {
            tracing::warn!("Frontier closed, dropping {}", closed.0);
        }
    }

    let result = PageResult {
        source_url: url,
        outgoing_links: parsed.links,
        assets: parsed.assets,
    };
    match context.aggregator.add_result(result).await {
        Ok(()) => context.counters.record_crawled(),
        Err(e) => tracing::warn!("Sitemap intake closed, dropping {}", e.0.source_url),
    }
}

async fn fetch_and_parse<F: Fetcher>(
    context: &WorkerContext<F>,
    url: &str,
) -> Result<ParsedPage, CrawlError> {
    tracing::debug!("Fetching {}", url);
    let page = context.fetcher.fetch(url).await?;
    tracing::debug!("Fetched url={} statusCode={}", url, page.status_code);

    if !page.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: page.status_code,
        }
        .into());
    }

    // Whatever the fetcher followed, the page must still be on the target host
    let final_url = Url::parse(&page.final_url).map_err(|source| ParseError::InvalidBaseUrl {
        url: page.final_url.clone(),
        source,
    })?;
    if !same_host(&final_url, &context.target_host) {
        return Err(FetchError::OffHostRedirect {
            url: url.to_string(),
            location: page.final_url,
        }
        .into());
    }

    let parsed = parse_page(
        &page.body,
        &page.final_url,
        page.content_type.as_deref(),
        &context.target_host,
    )?;
    Ok(parsed)
}

/// Runs a complete crawl of `target` over HTTP
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `target` - Hostname (`example.com`) or http(s) URL to start from
///
/// # Example
///
/// ```no_run
/// use sitemap_ripple::config::Config;
/// use sitemap_ripple::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "example.com").await?;
/// println!("{} pages", report.sitemap.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, target: &str) -> Result<CrawlReport, CrawlError> {
    let seed = seed_url_for_host(target)?;
    let fetcher = HttpFetcher::new(&config.http)?;
    Coordinator::new(config.crawler, fetcher).run(seed).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned pages from memory, counting fetches per URL
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, String>,
        redirects: HashMap<String, String>,
        fetches: Arc<std::sync::Mutex<HashMap<String, usize>>>,
        delay: Duration,
    }

    impl MapFetcher {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn redirect(mut self, from: &str, to: &str) -> Self {
            self.redirects.insert(from.to_string(), to.to_string());
            self
        }
    }

    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<crate::crawler::FetchedPage, FetchError> {
            *self
                .fetches
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_insert(0) += 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let served = self.redirects.get(url).map_or(url, String::as_str);
            match self.pages.get(served) {
                Some(body) => Ok(crate::crawler::FetchedPage::html(served, body.clone())),
                None => Ok(crate::crawler::FetchedPage {
                    final_url: served.to_string(),
                    status_code: 404,
                    content_type: None,
                    body: String::new(),
                }),
            }
        }
    }

    fn test_config(pool_size: usize, frontier_capacity: usize) -> CrawlerConfig {
        CrawlerConfig {
            frontier_capacity,
            pool_size,
            sample_interval_ms: 20,
            result_buffer: 4,
        }
    }

    #[tokio::test]
    async fn test_single_page_site() {
        let fetcher = MapFetcher::default().page("http://site.test/", "<html>hello</html>");
        let coordinator = Coordinator::new(test_config(2, 8), fetcher);

        let report = coordinator
            .run(Url::parse("http://site.test").unwrap())
            .await
            .unwrap();

        assert_eq!(report.root, "http://site.test/");
        assert_eq!(report.sitemap.len(), 1);
        assert!(report.sitemap.contains("http://site.test/"));
        assert_eq!(report.statistics.pages_crawled, 1);
    }

    #[tokio::test]
    async fn test_each_page_fetched_once() {
        // Every page links to every other page
        let urls: Vec<String> = (0..12).map(|i| format!("http://site.test/p{}", i)).collect();
        let links: String = urls
            .iter()
            .map(|u| format!(r#"<a href="{}">x</a>"#, u))
            .collect();

        let mut fetcher = MapFetcher {
            delay: Duration::from_millis(2),
            ..MapFetcher::default()
        }
        .page("http://site.test/", &links);
        for url in &urls {
            fetcher = fetcher.page(url, &links);
        }
        let fetches = Arc::clone(&fetcher.fetches);

        let coordinator = Coordinator::new(test_config(8, 4), fetcher);
        let report = coordinator
            .run(Url::parse("http://site.test/").unwrap())
            .await
            .unwrap();

        assert_eq!(report.sitemap.len(), 13);
        let fetches = fetches.lock().unwrap();
        assert_eq!(fetches.len(), 13);
        assert!(fetches.values().all(|&n| n == 1), "a page was fetched twice");
        assert_eq!(report.statistics.urls_claimed, 13);
    }

    #[tokio::test]
    async fn test_tiny_frontier_does_not_deadlock() {
        // A wide page with a one-slot frontier and a single worker
        let links: String = (0..50)
            .map(|i| format!(r#"<a href="/leaf{}">x</a>"#, i))
            .collect();
        let mut fetcher = MapFetcher::default().page("http://site.test/", &links);
        for i in 0..50 {
            fetcher = fetcher.page(&format!("http://site.test/leaf{}", i), "<p>leaf</p>");
        }

        let coordinator = Coordinator::new(test_config(1, 1), fetcher);
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            coordinator.run(Url::parse("http://site.test/").unwrap()),
        )
        .await
        .expect("crawl should finish")
        .unwrap();

        assert_eq!(report.sitemap.len(), 51);
    }

    #[tokio::test]
    async fn test_failed_pages_are_counted_not_recorded() {
        let fetcher = MapFetcher::default()
            .page("http://site.test/", r#"<a href="/missing">gone</a>"#);
        let coordinator = Coordinator::new(test_config(2, 8), fetcher);

        let report = coordinator
            .run(Url::parse("http://site.test/").unwrap())
            .await
            .unwrap();

        assert_eq!(report.sitemap.len(), 1);
        assert!(!report.sitemap.contains("http://site.test/missing"));
        assert_eq!(report.statistics.pages_failed, 1);
        assert_eq!(report.statistics.pages_crawled, 1);
    }

    #[tokio::test]
    async fn test_followed_redirect_off_host_is_rejected() {
        let fetcher = MapFetcher::default()
            .page("http://site.test/", r#"<a href="/out">out</a>"#)
            .redirect("http://site.test/out", "http://other.test/landing")
            .page(
                "http://other.test/landing",
                r#"<img src="/x.png"><a href="http://site.test/secret">s</a>"#,
            )
            .page("http://site.test/secret", "<p>secret</p>");
        let fetches = Arc::clone(&fetcher.fetches);

        let report = Coordinator::new(test_config(2, 8), fetcher)
            .run(Url::parse("http://site.test/").unwrap())
            .await
            .unwrap();

        assert_eq!(report.sitemap.len(), 1);
        assert!(!report.sitemap.contains("http://site.test/out"));
        assert!(!fetches.lock().unwrap().contains_key("http://site.test/secret"));
        assert_eq!(report.statistics.pages_failed, 1);
    }

    #[tokio::test]
    async fn test_followed_redirect_on_host_is_parsed_from_final_url() {
        let fetcher = MapFetcher::default()
            .page("http://site.test/", r#"<a href="/old/">old</a>"#)
            .redirect("http://site.test/old/", "http://site.test/new/")
            .page("http://site.test/new/", r#"<a href="child">child</a>"#)
            .page("http://site.test/new/child", "<p>child</p>");

        let report = Coordinator::new(test_config(2, 8), fetcher)
            .run(Url::parse("http://site.test/").unwrap())
            .await
            .unwrap();

        let old = report.sitemap.info_for("http://site.test/old/");
        assert!(old.outgoing_links.contains("http://site.test/new/child"));
        assert!(report.sitemap.contains("http://site.test/new/child"));
    }
}
