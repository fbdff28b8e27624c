use std::collections::HashSet;

/// Record of every href and resolved URL the validator has already seen
///
/// Raw hrefs and resolved URLs live in separate sets so that an href which
/// happens to equal some resolved URL never shadows it. First-seen wins in
/// both: once recorded, an entry is never validated or queued again.
#[derive(Debug, Clone, Default)]
pub struct DedupRegistry {
    hrefs: HashSet<String>,
    urls: HashSet<String>,
}

impl DedupRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the seed URL already marked in both sets
    pub fn seeded(seed: &str) -> Self {
        let mut registry = Self::new();
        registry.mark_href(seed);
        registry.mark_url(seed);
        registry
    }

    /// Records a raw href; returns false if it was already present
    pub fn mark_href(&mut self, href: &str) -> bool {
        if self.hrefs.contains(href) {
            return false;
        }
        self.hrefs.insert(href.to_string())
    }

    /// Records a resolved URL; returns false if it was already present
    pub fn mark_url(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn has_href(&self, href: &str) -> bool {
        self.hrefs.contains(href)
    }

    pub fn has_url(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of distinct resolved URLs recorded
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Number of distinct raw hrefs recorded
    pub fn href_count(&self) -> usize {
        self.hrefs.len()
    }
}
