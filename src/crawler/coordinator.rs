//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is breadth-first and level-synchronized:
//! - Every URL of the current depth is fetched concurrently
//! - Each fetched page is written to disk by a separately spawned task
//! - Links are extracted, filtered and width-capped into the next frontier
//! - The next depth starts only after every fetch of this depth finishes
//! - All pending writes are awaited before the crawl reports its statistics

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, PageResult};
use crate::crawler::frontier::{select_children, Frontier};
use crate::crawler::parser::{extract_links, LinkExtractor};
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlCounters, CrawlStatistics};
use crate::state::CrawlState;
use crate::storage::FsStorage;
use crate::url::normalize_url;
use crate::ScraperError;
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// State shared by every fetch and write task of one crawl
struct CrawlContext {
    client: Client,
    storage: FsStorage,
    visited: VisitedSet,
    counters: CrawlCounters,
    extractor: LinkExtractor,
    max_depth: u32,
    max_width: Option<usize>,
    unique_urls_only: bool,
    fetch_limit: Option<Arc<Semaphore>>,
    /// Write tasks still in flight, drained once traversal ends
    pending_writes: Mutex<JoinSet<()>>,
}

impl CrawlContext {
    /// Spawns a task that writes page bytes to storage
    fn dispatch_write(self: &Arc<Self>, url: String, depth: u32, body: Arc<[u8]>) {
        let ctx = Arc::clone(self);
        let mut pending = self
            .pending_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Reap finished writes so the set only holds in-flight ones
        while let Some(joined) = pending.try_join_next() {
            if let Err(e) = joined {
                tracing::warn!("Write task did not complete: {}", e);
            }
        }

        pending.spawn(async move {
            match ctx.storage.write_page(&url, depth, &body).await {
                Ok(path) => {
                    ctx.counters.record_write();
                    tracing::info!("Wrote {} to file {}", url, path.display());
                }
                Err(e) => {
                    ctx.counters.record_write_failure();
                    tracing::warn!("Failed to write {}: {}", url, e);
                }
            }
        });
    }

    /// Waits for every write dispatched so far
    async fn drain_writes(&self) {
        let mut pending = {
            let mut guard = self
                .pending_writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };

        tracing::debug!("Waiting for {} pending writes", pending.len());

        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Write task did not complete: {}", e);
            }
        }
    }
}

/// Fetches one page, dispatches its write, and returns its children
///
/// Children are only extracted below the maximum depth.
async fn crawl_page(ctx: Arc<CrawlContext>, url: String, depth: u32) -> Frontier {
    let _permit = match &ctx.fetch_limit {
        Some(limit) => Arc::clone(limit).acquire_owned().await.ok(),
        None => None,
    };

    let page = PageResult {
        result: fetch_url(&ctx.client, &url).await,
        url,
        depth,
    };

    let (final_url, body) = match page.result {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            ctx.counters.record_fetch();
            tracing::debug!(
                "Fetched {} at depth {} (HTTP {}, {} bytes)",
                page.url,
                depth,
                status_code,
                body.len()
            );
            (final_url, body)
        }
        FetchResult::Failed(failure) => {
            ctx.counters.record_fetch_failure();
            tracing::info!("Failed to fetch {}: {}", page.url, failure);
            return Vec::new();
        }
    };

    ctx.dispatch_write(page.url.clone(), depth, Arc::clone(&body));

    if depth >= ctx.max_depth {
        return Vec::new();
    }

    let base_url = match Url::parse(&final_url).or_else(|_| Url::parse(&page.url)) {
        Ok(base_url) => base_url,
        Err(e) => {
            tracing::debug!("Cannot resolve links for {}: {}", page.url, e);
            return Vec::new();
        }
    };

    let html = String::from_utf8_lossy(&body);
    let candidates = (ctx.extractor)(&html, &base_url);
    let candidate_count = candidates.len();

    let visited = ctx.unique_urls_only.then_some(&ctx.visited);
    let children = select_children(candidates, ctx.max_width, visited);

    tracing::debug!(
        "Selected {} of {} links from {}",
        children.len(),
        candidate_count,
        page.url
    );

    children
}

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    root_url: String,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScraperError)` - Invalid root URL or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        let root_url = String::from(normalize_url(&config.crawler.root_url)?);
        let client = build_http_client(&config.http)?;

        let fetch_limit = config
            .crawler
            .max_concurrent_fetches
            .map(|permits| Arc::new(Semaphore::new(permits)));

        let ctx = CrawlContext {
            client,
            storage: FsStorage::new(config.output.directory.clone()),
            visited: VisitedSet::new(),
            counters: CrawlCounters::new(),
            extractor: extract_links,
            max_depth: config.crawler.max_depth,
            max_width: config.crawler.max_width,
            unique_urls_only: config.crawler.unique_urls_only,
            fetch_limit,
            pending_writes: Mutex::new(JoinSet::new()),
        };

        Ok(Self {
            ctx: Arc::new(ctx),
            root_url,
            state: CrawlState::Idle,
        })
    }

    /// Replaces the link extraction strategy
    ///
    /// Only takes effect before the crawl starts.
    pub fn with_extractor(mut self, extractor: LinkExtractor) -> Self {
        if let Some(ctx) = Arc::get_mut(&mut self.ctx) {
            ctx.extractor = extractor;
        }
        self
    }

    /// Current position in the crawl
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Number of URLs recorded as visited (unique mode only)
    pub fn visited_count(&self) -> usize {
        self.ctx.visited.len()
    }

    /// Runs the crawl to completion
    pub async fn run(&mut self) -> Result<CrawlStatistics, ScraperError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the crawl until it completes or `shutdown` resolves
    ///
    /// On shutdown, in-flight fetches of the current level are aborted and no
    /// further level starts, but every write already dispatched is still
    /// awaited before the (partial) statistics are returned.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - Final counters for the run
    /// * `Err(ScraperError)` - The coordinator was already used
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<CrawlStatistics, ScraperError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let started_at = Utc::now();
        let start_time = Instant::now();
        let max_depth = self.ctx.max_depth;

        self.transition(CrawlState::Leveling(0))?;
        tracing::info!("Starting crawl from {} (max depth {})", self.root_url, max_depth);

        if self.ctx.unique_urls_only {
            self.ctx.visited.mark_if_new(&self.root_url);
        }

        let mut frontier: Frontier = vec![self.root_url.clone()];
        let mut depth = 0;
        let mut levels_completed = 0;
        let mut interrupted = false;

        loop {
            tracing::info!("Depth {}: fetching {} pages", depth, frontier.len());

            let mut level = JoinSet::new();
            for url in frontier.drain(..) {
                level.spawn(crawl_page(Arc::clone(&self.ctx), url, depth));
            }

            self.transition(CrawlState::Draining(depth))?;

            let mut next_frontier = Frontier::new();
            loop {
                tokio::select! {
                    biased;

                    () = &mut shutdown, if !interrupted => {
                        tracing::warn!("Interrupt received, stopping at depth {}", depth);
                        interrupted = true;
                        level.abort_all();
                    }
                    joined = level.join_next() => match joined {
                        Some(Ok(children)) => next_frontier.extend(children),
                        Some(Err(e)) if e.is_cancelled() => {}
                        Some(Err(e)) => tracing::warn!("Fetch task failed: {}", e),
                        None => break,
                    },
                }
            }

            if interrupted {
                break;
            }

            levels_completed += 1;
            tracing::info!(
                "Depth {} complete: {} URLs queued for depth {}",
                depth,
                next_frontier.len(),
                depth + 1
            );

            if depth >= max_depth || next_frontier.is_empty() {
                break;
            }

            depth += 1;
            frontier = next_frontier;
            self.transition(CrawlState::Leveling(depth))?;
        }

        self.ctx.drain_writes().await;
        self.transition(CrawlState::Done)?;

        let stats = CrawlStatistics::from_counters(
            &self.ctx.counters,
            levels_completed,
            interrupted,
            started_at,
            start_time.elapsed(),
        );

        tracing::info!("{}", stats.summary_line());

        Ok(stats)
    }

    /// Moves to a new state, rejecting transitions the crawl does not allow
    fn transition(&mut self, to: CrawlState) -> Result<(), ScraperError> {
        if !self.state.can_transition_to(to) {
            return Err(ScraperError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::trace!("Crawl state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }
}

/// Runs a complete crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed
/// * `Err(ScraperError)` - Crawl could not start
///
/// # Example
///
/// ```no_run
/// use html_scraper::config::load_config;
/// use html_scraper::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scraper.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{}", stats.summary_line());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, ScraperError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
