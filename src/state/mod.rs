//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: The phase of the polling loop (crawling, backing off, draining errors, terminated)

mod crawl_state;

pub use crawl_state::CrawlState;
