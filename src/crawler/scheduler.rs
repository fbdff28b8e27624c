//! Crawl scheduler: the polling state machine
//!
//! The scheduler owns every piece of mutable crawl state (frontier, error
//! queue, dedup registry, sitemap filter, retry counters) in a single
//! [`CrawlContext`]. It performs no I/O and never sleeps: each call to
//! [`Scheduler::tick`] advances the machine by one step and returns a
//! [`Step`] telling the driver what to do next (dispatch a fetch, wait one
//! polling interval, wait a backoff delay, or finish).
//!
//! Fetch completions are fed back through [`Scheduler::complete`], which only
//! appends to the frontier or the error queue.
//!
//! # States
//!
//! | State | Tick behavior |
//! |-------|---------------|
//! | Crawling | Pop one frontier URL, run it through the sitemap filter, dispatch it in deep mode. On an empty frontier, back off linearly until the retry budget is spent, then drain errors or terminate |
//! | EmptyBackoff | Resume crawling |
//! | ErrorDrain | Re-dispatch the URLs queued when the drain started, one per tick. Once they settle, resume crawling if the frontier gained entries, otherwise terminate |
//! | Terminated | Render the sitemap |

use crate::config::Config;
use crate::crawler::frontier::{ErrorQueue, FetchedSet, Frontier};
use crate::output::{render_sitemap, CrawlStatistics, Evaluation, SitemapFilter};
use crate::state::CrawlState;
use crate::url::{validate_href, DedupRegistry, OriginContext, Validation};
use crate::{ConfigError, FetchError};
use std::time::Duration;

/// Timing and behavior knobs for the scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Budget for both the empty-frontier backoff and the error drain
    pub max_retries: u32,

    /// Delay between polling ticks (already clamped)
    pub loop_interval: Duration,

    /// Empty-frontier backoff is `retry count × backoff_base`
    pub backoff_base: Duration,

    /// Delay before crawling resumes after an error drain
    pub error_resume_delay: Duration,

    /// Fetch every popped URL, not only the seed
    pub deep: bool,

    /// Evaluate the seed URL for the sitemap
    ///
    /// Off by default: only links discovered on fetched pages are listed.
    pub include_seed: bool,
}

impl SchedulerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.crawler.max_retry,
            loop_interval: config.effective_loop_interval(),
            backoff_base: Duration::from_millis(config.crawler.backoff_base),
            error_resume_delay: Duration::from_millis(config.crawler.error_resume_delay),
            deep: config.crawler.deep,
            include_seed: config.crawler.include_seed,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            loop_interval: Duration::from_millis(60),
            backoff_base: Duration::from_millis(1500),
            error_resume_delay: Duration::from_millis(1000),
            deep: true,
            include_seed: false,
        }
    }
}

/// What the driver should do after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Start fetching this URL, then wait one polling interval
    Fetch(String),
    /// Nothing to dispatch; wait one polling interval
    Idle,
    /// Wait for the given delay before the next tick
    Sleep(Duration),
    /// The crawl is over; carries the rendered sitemap document
    Done(String),
}

/// All mutable state of a crawl
#[derive(Debug, Clone)]
pub struct CrawlContext {
    pub origin: OriginContext,
    pub registry: DedupRegistry,
    pub frontier: Frontier,
    pub error_queue: ErrorQueue,
    pub fetched: FetchedSet,
    pub filter: SitemapFilter,

    /// Escaped URLs accepted into the sitemap, in evaluation order
    pub entries: Vec<String>,

    /// URLs kept out of the sitemap by a filter pattern
    pub excluded: usize,

    pub state: CrawlState,
    pub empty_retry_count: u32,
    pub error_retry_count: u32,

    /// Fetches dispatched whose completion has not been applied yet
    pub in_flight: usize,

    /// Error-queue URLs still to re-dispatch in the current drain
    pub drain_remaining: usize,

    /// URL handled on the most recent tick
    pub current: Option<String>,
}

/// Polling state machine driving a crawl to completion
#[derive(Debug, Clone)]
pub struct Scheduler {
    seed: String,
    config: SchedulerConfig,
    ctx: CrawlContext,
}

impl Scheduler {
    /// Creates a scheduler for `seed`
    ///
    /// The dedup registry starts with the seed already recorded so no page
    /// linking back to it queues it again.
    pub fn new(
        seed: impl Into<String>,
        origin: OriginContext,
        filter: SitemapFilter,
        config: SchedulerConfig,
    ) -> Self {
        let seed = seed.into();
        let ctx = CrawlContext {
            origin,
            registry: DedupRegistry::seeded(&seed),
            frontier: Frontier::new(),
            error_queue: ErrorQueue::new(),
            fetched: FetchedSet::new(),
            filter,
            entries: Vec::new(),
            excluded: 0,
            state: CrawlState::Crawling,
            empty_retry_count: 0,
            error_retry_count: 0,
            in_flight: 0,
            drain_remaining: 0,
            current: None,
        };

        Self { seed, config, ctx }
    }

    /// Builds a scheduler from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let origin = OriginContext::from_config(config)?;
        let filter = SitemapFilter::from_entries(&config.filters)?;
        Ok(Self::new(
            config.site.entry.clone(),
            origin,
            filter,
            SchedulerConfig::from_config(config),
        ))
    }

    /// Marks the seed as fetched and returns it for dispatch
    pub fn start(&mut self) -> String {
        let seed = self.seed.clone();
        tracing::info!(
            "Starting crawl of {} from {} (deep: {})",
            self.ctx.origin.host(),
            seed,
            self.config.deep
        );

        self.ctx.fetched.insert(&seed);
        if self.config.include_seed {
            self.record_sitemap(&seed);
        }
        self.ctx.in_flight += 1;
        self.ctx.current = Some(seed.clone());
        seed
    }

    /// Advances the state machine by one step
    pub fn tick(&mut self) -> Step {
        match self.ctx.state {
            CrawlState::Crawling => self.crawl_tick(),
            CrawlState::EmptyBackoff => {
                self.transition(CrawlState::Crawling);
                self.crawl_tick()
            }
            CrawlState::ErrorDrain => self.drain_tick(),
            CrawlState::Terminated => Step::Done(self.render()),
        }
    }

    /// Applies the outcome of a fetch
    ///
    /// On success each href is validated in document order and the accepted
    /// ones are appended to the frontier. On failure the URL goes to the
    /// error queue. Returns the number of links accepted.
    pub fn complete(&mut self, url: &str, outcome: Result<Vec<String>, FetchError>) -> usize {
        self.ctx.in_flight = self.ctx.in_flight.saturating_sub(1);

        match outcome {
            Ok(hrefs) => {
                let mut accepted = 0;
                for href in &hrefs {
                    match validate_href(Some(href), &self.ctx.origin, &mut self.ctx.registry) {
                        Validation::Accepted(resolved) => {
                            self.ctx.frontier.enqueue(resolved);
                            accepted += 1;
                        }
                        Validation::Rejected(reason) => {
                            tracing::trace!("Rejected href {:?} on {}: {:?}", href, url, reason);
                        }
                    }
                }
                tracing::debug!(
                    "Fetched {}: {} links, {} new",
                    url,
                    hrefs.len(),
                    accepted
                );
                accepted
            }
            Err(e) => {
                tracing::warn!("Fetch failed, queued for retry: {}", e);
                self.ctx.error_queue.enqueue(url);
                0
            }
        }
    }

    fn crawl_tick(&mut self) -> Step {
        if let Some(url) = self.ctx.frontier.dequeue_next() {
            self.ctx.empty_retry_count = 0;
            self.ctx.fetched.insert(&url);
            self.record_sitemap(&url);
            self.ctx.current = Some(url.clone());

            if self.config.deep {
                self.ctx.in_flight += 1;
                return Step::Fetch(url);
            }
            return Step::Idle;
        }

        if self.ctx.empty_retry_count < self.config.max_retries {
            self.ctx.empty_retry_count += 1;
            let delay = self.config.backoff_base * self.ctx.empty_retry_count;
            tracing::debug!(
                "Frontier empty, backing off {:?} (retry {}/{})",
                delay,
                self.ctx.empty_retry_count,
                self.config.max_retries
            );
            self.transition(CrawlState::EmptyBackoff);
            return Step::Sleep(delay);
        }

        if !self.ctx.error_queue.is_empty()
            && self.ctx.error_retry_count < self.config.max_retries
        {
            self.ctx.drain_remaining = self.ctx.error_queue.len();
            self.transition(CrawlState::ErrorDrain);
            return Step::Idle;
        }

        self.terminate()
    }

    fn drain_tick(&mut self) -> Step {
        if self.ctx.drain_remaining > 0 {
            if let Some(url) = self.ctx.error_queue.dequeue_next() {
                self.ctx.drain_remaining -= 1;
                self.ctx.in_flight += 1;
                self.ctx.current = Some(url.clone());
                return Step::Fetch(url);
            }
            self.ctx.drain_remaining = 0;
        }

        // Retries still running may yet feed the frontier
        if self.ctx.in_flight > 0 {
            return Step::Idle;
        }

        if !self.ctx.frontier.is_empty() {
            self.ctx.error_retry_count += 1;
            tracing::debug!(
                "Error drain found {} new URLs, resuming in {:?} (retry {}/{})",
                self.ctx.frontier.len(),
                self.config.error_resume_delay,
                self.ctx.error_retry_count,
                self.config.max_retries
            );
            self.transition(CrawlState::Crawling);
            return Step::Sleep(self.config.error_resume_delay);
        }

        self.terminate()
    }

    fn terminate(&mut self) -> Step {
        self.transition(CrawlState::Terminated);
        self.ctx.current = None;
        Step::Done(self.render())
    }

    fn record_sitemap(&mut self, url: &str) {
        match self.ctx.filter.evaluate(Some(url)) {
            Evaluation::Included(escaped) => self.ctx.entries.push(escaped),
            Evaluation::Excluded { pattern } => {
                self.ctx.excluded += 1;
                tracing::debug!("Excluded {} from sitemap ({})", url, pattern);
            }
            Evaluation::Skipped => {}
        }
    }

    fn transition(&mut self, next: CrawlState) {
        let from = self.ctx.state;
        if from == next {
            return;
        }
        debug_assert!(
            from.can_transition_to(next),
            "Invalid crawl state transition: {} -> {}",
            from,
            next
        );
        tracing::info!("Crawl state {} -> {}", from, next);
        self.ctx.state = next;
    }

    /// Renders the sitemap from the entries accumulated so far
    pub fn render(&self) -> String {
        render_sitemap(&self.ctx.entries)
    }

    /// Snapshot of progress counters
    pub fn statistics(&self, elapsed: Duration) -> CrawlStatistics {
        CrawlStatistics {
            collected: self.ctx.entries.len(),
            queued: self.ctx.frontier.len(),
            fetched: self.ctx.fetched.len(),
            errors: self.ctx.error_queue.len(),
            excluded: self.ctx.excluded,
            elapsed,
            current: self.ctx.current.clone(),
        }
    }

    pub fn state(&self) -> CrawlState {
        self.ctx.state
    }

    pub fn context(&self) -> &CrawlContext {
        &self.ctx
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Escaped sitemap entries accumulated so far
    pub fn entries(&self) -> &[String] {
        &self.ctx.entries
    }
}
