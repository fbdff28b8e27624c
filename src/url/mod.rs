//! URL handling module for Sumi-Sitemap
//!
//! This module decides which discovered links are in scope: it resolves raw
//! hrefs against the crawl origin, encodes them, and records everything it
//! has seen so that no URL is queued twice.

mod encode;
mod origin;
mod registry;
mod validate;

pub use encode::{decode_for_display, encode_link};
pub use origin::OriginContext;
pub use registry::DedupRegistry;
pub use validate::{validate_href, Rejection, Validation};
