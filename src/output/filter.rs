//! Sitemap exclusion filters
//!
//! Every URL popped from the frontier passes through the filter exactly once.
//! URLs matching any pattern are kept out of the sitemap; the rest are
//! XML-escaped and become sitemap entries.

use crate::config::FilterEntry;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// A compiled exclusion pattern
#[derive(Debug, Clone)]
pub enum FilterPattern {
    /// Matches when the URL contains the literal text
    Contains(String),
    /// Matches when the regular expression finds a match anywhere in the URL
    Regex(Regex),
}

impl FilterPattern {
    /// Compiles a config entry into a pattern
    pub fn compile(entry: &FilterEntry) -> Result<Self, ConfigError> {
        match entry {
            FilterEntry::Contains(text) => Ok(Self::Contains(text.clone())),
            FilterEntry::Regex(source) => Regex::new(source)
                .map(Self::Regex)
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", source, e))),
        }
    }

    /// Compiles all config entries, preserving declaration order
    pub fn compile_all(entries: &[FilterEntry]) -> Result<Vec<Self>, ConfigError> {
        entries.iter().map(Self::compile).collect()
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Contains(text) => url.contains(text.as_str()),
            Self::Regex(re) => re.is_match(url),
        }
    }
}

impl fmt::Display for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(text) => write!(f, "contains:{}", text),
            Self::Regex(re) => write!(f, "regex:{}", re.as_str()),
        }
    }
}

/// Outcome of running a URL through the sitemap filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Belongs in the sitemap; carries the XML-escaped URL
    Included(String),
    /// Matched an exclusion pattern
    Excluded { pattern: String },
    /// Absent, or already evaluated once
    Skipped,
}

impl Evaluation {
    /// True for every outcome that does not produce a sitemap entry
    pub fn is_excluded(&self) -> bool {
        !matches!(self, Self::Included(_))
    }

    pub fn escaped_url(&self) -> Option<&str> {
        match self {
            Self::Included(url) => Some(url),
            _ => None,
        }
    }
}

/// Exclusion patterns plus the record of URLs already evaluated
///
/// The evaluated set is independent from the validator's dedup registry.
#[derive(Debug, Clone, Default)]
pub struct SitemapFilter {
    patterns: Vec<FilterPattern>,
    evaluated: HashSet<String>,
}

impl SitemapFilter {
    pub fn new(patterns: Vec<FilterPattern>) -> Self {
        Self {
            patterns,
            evaluated: HashSet::new(),
        }
    }

    /// Builds a filter from the configured entries
    pub fn from_entries(entries: &[FilterEntry]) -> Result<Self, ConfigError> {
        Ok(Self::new(FilterPattern::compile_all(entries)?))
    }

    /// Decides whether `url` goes into the sitemap
    ///
    /// Patterns are tested in declaration order and the first match wins.
    /// Each URL is evaluated at most once; later calls return `Skipped`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sitemap::output::{Evaluation, FilterPattern, SitemapFilter};
    ///
    /// let mut filter = SitemapFilter::new(vec![FilterPattern::Contains("/admin".into())]);
    /// assert!(filter.evaluate(Some("https://a.com/admin/x")).is_excluded());
    /// assert_eq!(
    ///     filter.evaluate(Some("https://a.com/shop?a=1&b=2")),
    ///     Evaluation::Included("https://a.com/shop?a=1&amp;b=2".to_string())
    /// );
    /// ```
    pub fn evaluate(&mut self, url: Option<&str>) -> Evaluation {
        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => return Evaluation::Skipped,
        };

        if !self.evaluated.insert(url.to_string()) {
            return Evaluation::Skipped;
        }

        if let Some(pattern) = self.patterns.iter().find(|p| p.matches(url)) {
            return Evaluation::Excluded {
                pattern: pattern.to_string(),
            };
        }

        Evaluation::Included(escape_xml(url))
    }

    /// Number of distinct URLs evaluated so far
    pub fn evaluated_count(&self) -> usize {
        self.evaluated.len()
    }

    pub fn patterns(&self) -> &[FilterPattern] {
        &self.patterns
    }
}

/// Escapes the five XML special characters
///
/// `&` is replaced first so the entities introduced afterwards are not
/// escaped a second time.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}
