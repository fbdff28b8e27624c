//! Output module for turning crawled URLs into a sitemap
//!
//! This module handles:
//! - Filtering and XML-escaping URLs bound for the sitemap
//! - Rendering the sitemap document
//! - Writing the document to disk
//! - Reporting crawl statistics

mod filter;
mod sitemap;
pub mod stats;
mod writer;

pub use filter::{escape_xml, Evaluation, FilterPattern, SitemapFilter};
pub use sitemap::{render_sitemap, SITEMAP_NAMESPACE};
pub use stats::{format_elapsed, print_statistics, CrawlStatistics};
pub use writer::{sitemap_path, write_sitemap};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
