use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterEntry>,
}

impl Config {
    /// Polling interval after clamping to the configured floor
    pub fn effective_loop_interval(&self) -> Duration {
        Duration::from_millis(
            self.crawler
                .loop_interval
                .max(self.crawler.min_loop_interval),
        )
    }
}

/// The site being mapped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Host that discovered links must match (e.g., "www.example.com")
    #[serde(default)]
    pub host: String,

    /// Seed URL, including its scheme (e.g., "https://www.example.com/")
    #[serde(default)]
    pub entry: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the sitemap document is written to
    #[serde(default)]
    pub path: String,

    /// File name without the ".xml" extension
    #[serde(default = "default_filename")]
    pub filename: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Retry budget shared by the empty-frontier backoff and the error drain
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,

    /// Polling interval in milliseconds
    #[serde(default = "default_loop_interval")]
    pub loop_interval: u64,

    /// Floor for the polling interval (milliseconds)
    #[serde(default = "default_min_loop_interval")]
    pub min_loop_interval: u64,

    /// Base delay for the linear empty-frontier backoff (milliseconds)
    #[serde(default = "default_backoff_base")]
    pub backoff_base: u64,

    /// Delay before crawling resumes after the error drain (milliseconds)
    #[serde(default = "default_error_resume_delay")]
    pub error_resume_delay: u64,

    /// Follow links found on every fetched page, not just the seed
    #[serde(default = "default_true")]
    pub deep: bool,

    /// List the seed URL itself in the sitemap; off unless asked for
    #[serde(default)]
    pub include_seed: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_retry: default_max_retry(),
            loop_interval: default_loop_interval(),
            min_loop_interval: default_min_loop_interval(),
            backoff_base: default_backoff_base(),
            error_resume_delay: default_error_resume_delay(),
            deep: true,
            include_seed: false,
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// A sitemap exclusion filter as written in the config file
///
/// ```toml
/// [[filter]]
/// contains = "/admin"
///
/// [[filter]]
/// regex = "\\.pdf$"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterEntry {
    /// Literal substring test
    Contains(String),
    /// Regular expression test
    Regex(String),
}

fn default_filename() -> String {
    "sitemap".to_string()
}

fn default_max_retry() -> u32 {
    3
}

fn default_loop_interval() -> u64 {
    60
}

fn default_min_loop_interval() -> u64 {
    20
}

fn default_backoff_base() -> u64 {
    1500
}

fn default_error_resume_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("sumi-sitemap/{}", env!("CARGO_PKG_VERSION"))
}
