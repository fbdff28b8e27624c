//! HTML link extraction
//!
//! Pulls the raw `href` value of every anchor out of a page. Nothing is
//! resolved or filtered here; deciding which links are in scope is the
//! validator's job.

use scraper::{Html, Selector};

/// Extracts anchor hrefs from HTML markup in document order
///
/// Anchors without an `href` attribute are skipped. Values are returned
/// exactly as written in the markup.
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::extract_hrefs;
///
/// let html = r#"<a href="/a">A</a><a name="top"></a><a href="https://b.com/">B</a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a", "https://b.com/"]);
/// ```
pub fn extract_hrefs(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
