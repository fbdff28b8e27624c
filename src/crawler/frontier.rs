//! FIFO URL queues used by the scheduler
//!
//! The frontier and the error queue share one implementation. Neither
//! deduplicates; that is the validator's job before anything is enqueued.

use std::collections::{HashSet, VecDeque};

/// First-in, first-out queue of resolved URLs
#[derive(Debug, Clone, Default)]
pub struct UrlQueue {
    urls: VecDeque<String>,
}

impl UrlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the tail
    pub fn enqueue(&mut self, url: impl Into<String>) {
        self.urls.push_back(url.into());
    }

    /// Pops the URL at the head, if any
    pub fn dequeue_next(&mut self) -> Option<String> {
        self.urls.pop_front()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Validated URLs not yet fetched
pub type Frontier = UrlQueue;

/// URLs whose most recent fetch failed
pub type ErrorQueue = UrlQueue;

/// URLs already popped and submitted to fetch
///
/// Used for progress accounting only.
#[derive(Debug, Clone, Default)]
pub struct FetchedSet {
    urls: HashSet<String>,
}

impl FetchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a URL; returns false if it was already recorded
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
