//! HTTP fetcher implementation
//!
//! This module handles every page request the crawler makes:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning page markup
//! - Classifying failures (timeouts, transport errors, non-2xx responses)

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Source of page markup
///
/// The coordinator only ever talks to pages through this trait, so crawls
/// can be driven against an in-memory site in tests.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches `url` and returns its body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::CrawlerConfig;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        let request = self.client.get(url);
        let url = url.to_string();
        async move { fetch_url(request, url).await }
    }
}

/// Sends a prepared GET request and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | body text |
/// | Any other status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection or other transport error | `FetchError::Http` |
/// | Body could not be read | `FetchError::Body` |
async fn fetch_url(request: reqwest::RequestBuilder, url: String) -> Result<String, FetchError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return Err(FetchError::Timeout { url }),
        Err(e) => return Err(FetchError::Http { url, source: e }),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url,
        message: e.to_string(),
    })
}
