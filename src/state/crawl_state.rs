/// Crawl state definitions for the polling scheduler
///
/// This module defines the states the crawl loop moves through between the
/// first tick and the rendering of the sitemap.
use std::fmt;

/// Represents the current phase of the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Popping URLs from the frontier on every polling tick
    Crawling,

    /// Frontier went empty; waiting for in-flight fetches to replenish it
    EmptyBackoff,

    /// Frontier is exhausted; retrying URLs whose fetch failed
    ErrorDrain,

    /// Crawl is over; the sitemap has been rendered
    Terminated,
}

impl CrawlState {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Staying in a polling state counts as a transition so the scheduler can
    /// check every tick the same way.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        use CrawlState::*;
        matches!(
            (self, next),
            (Crawling, Crawling)
                | (Crawling, EmptyBackoff)
                | (Crawling, ErrorDrain)
                | (Crawling, Terminated)
                | (EmptyBackoff, Crawling)
                | (ErrorDrain, ErrorDrain)
                | (ErrorDrain, Crawling)
                | (ErrorDrain, Terminated)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crawling => "crawling",
            Self::EmptyBackoff => "empty_backoff",
            Self::ErrorDrain => "error_drain",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [CrawlState; 4] = [
        CrawlState::Crawling,
        CrawlState::EmptyBackoff,
        CrawlState::ErrorDrain,
        CrawlState::Terminated,
    ];

    #[test]
    fn test_backoff_only_resumes_crawling() {
        assert!(CrawlState::EmptyBackoff.can_transition_to(CrawlState::Crawling));
        assert!(!CrawlState::EmptyBackoff.can_transition_to(CrawlState::ErrorDrain));
        assert!(!CrawlState::EmptyBackoff.can_transition_to(CrawlState::Terminated));
    }

    #[test]
    fn test_error_drain_never_backs_off() {
        assert!(!CrawlState::ErrorDrain.can_transition_to(CrawlState::EmptyBackoff));
    }

    #[test]
    fn test_terminated_is_final() {
        for state in ALL_STATES {
            assert!(
                !CrawlState::Terminated.can_transition_to(state),
                "Terminated must not move to {}",
                state
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::Crawling), "crawling");
        assert_eq!(format!("{}", CrawlState::EmptyBackoff), "empty_backoff");
        assert_eq!(format!("{}", CrawlState::ErrorDrain), "error_drain");
        assert_eq!(format!("{}", CrawlState::Terminated), "terminated");
    }
}
