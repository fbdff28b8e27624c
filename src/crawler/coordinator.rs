//! Crawler coordinator - drives the scheduler in real time
//!
//! This module contains the crawl loop that ties the scheduler to the
//! outside world:
//! - Fetching the seed page before polling starts
//! - Sleeping between ticks as each [`Step`] dictates
//! - Spawning fetches without waiting for them
//! - Applying fetch completions at tick boundaries
//! - Writing the final sitemap
//!
//! Fetch tasks never touch crawl state. They send their outcome over a
//! channel, and the loop drains that channel before every tick, so all
//! mutation happens on the loop itself.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::scheduler::{Scheduler, Step};
use crate::output::{write_sitemap, CrawlStatistics};
use crate::state::CrawlState;
use crate::{FetchError, SitemapError};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Number of ticks between progress log lines
const PROGRESS_EVERY: u64 = 10;

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Rendered sitemap document
    pub document: String,

    /// Final progress counters
    pub statistics: CrawlStatistics,

    /// State the scheduler ended in
    pub final_state: CrawlState,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Where the document was written, once persisted
    pub output_path: Option<PathBuf>,
}

/// A fetch outcome waiting to be applied
#[derive(Debug)]
struct Completion {
    url: String,
    outcome: Result<Vec<String>, FetchError>,
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    scheduler: Scheduler,
    fetcher: Arc<F>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around an already configured scheduler
    pub fn new(scheduler: Scheduler, fetcher: F) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            scheduler,
            fetcher: Arc::new(fetcher),
            completions_tx,
            completions_rx,
        }
    }

    /// Creates a coordinator from a validated configuration
    pub fn from_config(config: &Config, fetcher: F) -> Result<Self, SitemapError> {
        let scheduler = Scheduler::from_config(config)?;
        Ok(Self::new(scheduler, fetcher))
    }

    /// Runs the crawl until the scheduler terminates
    ///
    /// The seed is fetched first. Its links fill the frontier before the
    /// polling loop begins.
    pub async fn run(mut self) -> CrawlReport {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let seed = self.scheduler.start();
        let outcome = fetch_and_extract(self.fetcher.as_ref(), &seed).await;
        self.scheduler.complete(&seed, outcome);

        let loop_interval = self.scheduler.config().loop_interval;
        let mut ticks: u64 = 0;

        let document = loop {
            self.apply_completions();

            let step = self.scheduler.tick();
            ticks += 1;

            let stats = self.scheduler.statistics(start_time.elapsed());
            if ticks % PROGRESS_EVERY == 0 {
                tracing::info!("{}", stats.progress_line());
            } else {
                tracing::trace!("{}", stats.progress_line());
            }

            match step {
                Step::Fetch(url) => {
                    self.dispatch(url);
                    tokio::time::sleep(loop_interval).await;
                }
                Step::Idle => tokio::time::sleep(loop_interval).await,
                Step::Sleep(delay) => tokio::time::sleep(delay).await,
                Step::Done(document) => break document,
            }
        };

        let statistics = self.scheduler.statistics(start_time.elapsed());
        tracing::info!(
            "Crawl completed: {} ({} ticks)",
            statistics.progress_line(),
            ticks
        );

        CrawlReport {
            document,
            statistics,
            final_state: self.scheduler.state(),
            started_at,
            finished_at: Utc::now(),
            output_path: None,
        }
    }

    /// Applies every fetch outcome that arrived since the last tick
    fn apply_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.scheduler
                .complete(&completion.url, completion.outcome);
        }
    }

    /// Starts fetching `url` in the background
    ///
    /// Every dispatch sends exactly one completion, even when the fetch task
    /// panics, so the scheduler's in-flight count always settles.
    fn dispatch(&self, url: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let fetch = {
                let url = url.clone();
                tokio::spawn(async move { fetch_and_extract(fetcher.as_ref(), &url).await })
            };

            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Fetch task for {} did not finish: {}", url, e);
                    Err(FetchError::Aborted {
                        message: e.to_string(),
                        url: url.clone(),
                    })
                }
            };

            // The receiver is gone once the crawl has terminated
            let _ = tx.send(Completion { url, outcome });
        });
    }
}

/// Fetches a page and extracts its hrefs
async fn fetch_and_extract<F: Fetcher>(
    fetcher: &F,
    url: &str,
) -> Result<Vec<String>, FetchError> {
    let markup = fetcher.fetch(url).await?;
    Ok(extract_hrefs(&markup))
}

/// Runs a complete crawl and writes the sitemap
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP fetcher
/// 2. Crawl until the scheduler terminates
/// 3. Write `<output.path>/<output.filename>.xml`
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::load_config;
/// use sumi_sitemap::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sitemap.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} URLs listed", report.statistics.collected);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, SitemapError> {
    let fetcher = HttpFetcher::new(&config.crawler)?;
    let coordinator = Coordinator::from_config(config, fetcher)?;

    let mut report = coordinator.run().await;

    let path = write_sitemap(
        Path::new(&config.output.path),
        &config.output.filename,
        &report.document,
    )?;
    report.output_path = Some(path);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::scheduler::SchedulerConfig;
    use crate::output::SitemapFilter;
    use crate::url::OriginContext;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory site; unknown URLs answer 404
    #[derive(Default)]
    struct SiteFetcher {
        pages: HashMap<String, String>,
        failures_left: Mutex<HashMap<String, usize>>,
        calls: AtomicUsize,
    }

    impl SiteFetcher {
        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let body = links
                .iter()
                .map(|href| format!(r#"<a href="{}">link</a>"#, href))
                .collect::<String>();
            self.pages
                .insert(url.to_string(), format!("<html><body>{}</body></html>", body));
            self
        }

        fn failing(self, url: &str, times: usize) -> Self {
            self.failures_left
                .lock()
                .unwrap()
                .insert(url.to_string(), times);
            self
        }
    }

    impl Fetcher for SiteFetcher {
        fn fetch(
            &self,
            url: &str,
        ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let failing = {
                let mut failures = self.failures_left.lock().unwrap();
                match failures.get_mut(url) {
                    Some(left) if *left > 0 => {
                        *left -= 1;
                        true
                    }
                    _ => false,
                }
            };

            let result = match self.pages.get(url) {
                Some(body) if !failing => Ok(body.clone()),
                _ => Err(FetchError::Status {
                    url: url.to_string(),
                    status: if failing { 503 } else { 404 },
                }),
            };
            async move { result }
        }
    }

    fn test_config(deep: bool) -> SchedulerConfig {
        SchedulerConfig {
            max_retries: 2,
            loop_interval: Duration::from_millis(1),
            backoff_base: Duration::from_millis(5),
            error_resume_delay: Duration::from_millis(5),
            deep,
            include_seed: false,
        }
    }

    fn create_coordinator(fetcher: SiteFetcher, deep: bool) -> Coordinator<SiteFetcher> {
        let scheduler = Scheduler::new(
            "https://a.com/",
            OriginContext::new("a.com", "https"),
            SitemapFilter::default(),
            test_config(deep),
        );
        Coordinator::new(scheduler, fetcher)
    }

    fn locs(document: &str) -> HashSet<String> {
        document
            .lines()
            .filter_map(|line| {
                line.trim()
                    .strip_prefix("<loc>")
                    .and_then(|rest| rest.strip_suffix("</loc>"))
                    .map(str::to_string)
            })
            .collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_deep_crawl_maps_whole_site() {
        let site = SiteFetcher::default()
            .page("https://a.com/", &["/a", "/b", "http://other.com/x", "mailto:x@a.com"])
            .page("https://a.com/a", &["/c", "/b", "/"])
            .page("https://a.com/b", &["/a?x=1&y=2"])
            .page("https://a.com/c", &[])
            .page("https://a.com/a?x=1&y=2", &[]);

        let report = create_coordinator(site, true).run().await;

        assert_eq!(report.final_state, CrawlState::Terminated);
        assert_eq!(
            locs(&report.document),
            set(&[
                "https://a.com/a",
                "https://a.com/b",
                "https://a.com/c",
                "https://a.com/a?x=1&amp;y=2",
            ])
        );
        assert_eq!(report.statistics.errors, 0);
        assert_eq!(report.statistics.fetched, 5);
    }

    #[tokio::test]
    async fn test_shallow_crawl_fetches_seed_only() {
        let site = SiteFetcher::default()
            .page("https://a.com/", &["/a", "/b"])
            .page("https://a.com/a", &["/hidden"]);

        let coordinator = create_coordinator(site, false);
        let fetcher = Arc::clone(&coordinator.fetcher);
        let report = coordinator.run().await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            locs(&report.document),
            set(&["https://a.com/a", "https://a.com/b"])
        );
    }

    #[tokio::test]
    async fn test_failed_page_recovered_by_error_drain() {
        let site = SiteFetcher::default()
            .page("https://a.com/", &["/flaky"])
            .page("https://a.com/flaky", &["/hidden"])
            .page("https://a.com/hidden", &[])
            .failing("https://a.com/flaky", 1);

        let report = create_coordinator(site, true).run().await;

        assert!(locs(&report.document).contains("https://a.com/hidden"));
        assert_eq!(report.statistics.errors, 0);
    }

    #[tokio::test]
    async fn test_unreachable_seed_still_terminates() {
        let report = create_coordinator(SiteFetcher::default(), true).run().await;

        assert_eq!(report.final_state, CrawlState::Terminated);
        assert!(locs(&report.document).is_empty());
        assert_eq!(report.statistics.errors, 1);
        assert!(report.finished_at >= report.started_at);
    }

    /// Panics on one URL, serves the rest from an in-memory site
    struct PanickingFetcher {
        site: SiteFetcher,
        panic_on: String,
    }

    impl Fetcher for PanickingFetcher {
        fn fetch(
            &self,
            url: &str,
        ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send {
            let panics = url == self.panic_on;
            let result = self.site.fetch(url);
            async move {
                if panics {
                    panic!("fetcher blew up");
                }
                result.await
            }
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_still_completes() {
        let fetcher = PanickingFetcher {
            site: SiteFetcher::default()
                .page("https://a.com/", &["/boom", "/ok"])
                .page("https://a.com/ok", &[]),
            panic_on: "https://a.com/boom".to_string(),
        };
        let scheduler = Scheduler::new(
            "https://a.com/",
            OriginContext::new("a.com", "https"),
            SitemapFilter::default(),
            test_config(true),
        );

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            Coordinator::new(scheduler, fetcher).run(),
        )
        .await
        .expect("crawl must terminate when a fetch task panics");

        assert_eq!(report.final_state, CrawlState::Terminated);
        assert_eq!(report.statistics.errors, 1);
        assert_eq!(
            locs(&report.document),
            set(&["https://a.com/boom", "https://a.com/ok"])
        );
    }
}
