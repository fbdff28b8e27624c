//! Crawl progress accounting
//!
//! This module turns the scheduler's counters into the progress line logged
//! while crawling and the summary printed once the sitemap is written.

use crate::url::decode_for_display;
use std::time::Duration;

/// Snapshot of crawl progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// URLs accepted into the sitemap
    pub collected: usize,

    /// URLs waiting in the frontier
    pub queued: usize,

    /// URLs already submitted to fetch
    pub fetched: usize,

    /// URLs waiting in the error queue
    pub errors: usize,

    /// URLs kept out of the sitemap by a filter
    pub excluded: usize,

    /// Time since the crawl started
    pub elapsed: Duration,

    /// URL handled on the most recent tick
    pub current: Option<String>,
}

impl CrawlStatistics {
    /// Every URL known to the crawl, queued or already fetched
    pub fn total(&self) -> usize {
        self.queued + self.fetched
    }

    /// "collected/total", as shown in progress output
    pub fn resolve_rate(&self) -> String {
        format!("{}/{}", self.collected, self.total())
    }

    /// One-line progress report
    ///
    /// The current URL is percent-decoded so non-ASCII paths stay readable.
    pub fn progress_line(&self) -> String {
        let mut line = format!(
            "elapsed: {} | collected/total: {} | errors: {}",
            format_elapsed(self.elapsed),
            self.resolve_rate(),
            self.errors
        );
        if let Some(current) = &self.current {
            line.push_str(&format!(" | current: {}", decode_for_display(current)));
        }
        line
    }
}

/// Formats a duration as `HH:MM:SS`
///
/// ```
/// use std::time::Duration;
/// use sumi_sitemap::output::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Prints the end-of-crawl summary to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Elapsed: {}", format_elapsed(stats.elapsed));
    println!("  Collected/total: {}", stats.resolve_rate());
    println!("  Excluded by filters: {}", stats.excluded);
    println!("  Still failing: {}", stats.errors);
    println!();

    let coverage = if stats.total() > 0 {
        (stats.collected as f64 / stats.total() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Coverage: {:.1}% ({} / {} URLs listed in the sitemap)",
        coverage,
        stats.collected,
        stats.total()
    );
}
