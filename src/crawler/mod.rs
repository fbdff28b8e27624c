//! Crawler module for page fetching and crawl scheduling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link extraction
//! - The polling scheduler and its queues
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use frontier::{ErrorQueue, FetchedSet, Frontier, UrlQueue};
pub use parser::extract_hrefs;
pub use scheduler::{CrawlContext, Scheduler, SchedulerConfig, Step};
