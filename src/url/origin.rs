use crate::config::Config;
use crate::ConfigError;

/// Host and scheme every discovered link is resolved against
///
/// Both are fixed at crawl start. The scheme is taken from the seed URL and
/// is reused for every resolved link, whatever scheme the link itself used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginContext {
    host: String,
    scheme: String,
}

impl OriginContext {
    /// Creates an origin from an explicit host and scheme
    pub fn new(host: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: scheme.into(),
        }
    }

    /// Builds the origin from the configured host and the seed URL's scheme
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sitemap::url::OriginContext;
    ///
    /// let origin = OriginContext::from_seed("example.com", "http://example.com/start").unwrap();
    /// assert_eq!(origin.scheme(), "http");
    /// assert_eq!(origin.host(), "example.com");
    /// ```
    pub fn from_seed(host: &str, entry: &str) -> Result<Self, ConfigError> {
        match entry.split_once("://") {
            Some((scheme, _)) if !scheme.is_empty() => Ok(Self::new(host, scheme)),
            _ => Err(ConfigError::InvalidUrl(format!(
                "entry '{}' must include an http or https scheme",
                entry
            ))),
        }
    }

    /// Builds the origin from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::from_seed(&config.site.host, &config.site.entry)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Prefixes `host_and_path` with the origin scheme
    pub fn absolute(&self, host_and_path: &str) -> String {
        format!("{}://{}", self.scheme, host_and_path)
    }
}
