//! Sitemap document rendering
//!
//! Produces a sitemap-protocol document: an XML declaration, a single
//! `<urlset>` root carrying the protocol namespace, and one `<url><loc>`
//! element per entry. No `<lastmod>` or `<priority>` fields are written.

/// Namespace declared on the `<urlset>` root
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders already-escaped sitemap entries into a complete document
///
/// Entries are written verbatim and in order; escaping is the filter's job.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::output::render_sitemap;
///
/// let xml = render_sitemap(&["https://a.com/".to_string()]);
/// assert!(xml.starts_with("<?xml"));
/// assert!(xml.contains("<loc>https://a.com/</loc>"));
/// ```
pub fn render_sitemap(entries: &[String]) -> String {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", entry));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    /// Collects the unescaped text of every `<loc>` element
    fn parse_locs(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut in_loc = false;
        let mut locs = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => in_loc = e.name().as_ref() == b"loc",
                Ok(Event::Text(ref e)) if in_loc => {
                    locs.push(e.unescape().unwrap().to_string());
                }
                Ok(Event::End(_)) => in_loc = false,
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid XML: {}", e),
                _ => {}
            }
            buf.clear();
        }

        locs
    }

    #[test]
    fn test_round_trip_single_entry() {
        let xml = render_sitemap(&["https://a.com/".to_string()]);
        assert_eq!(parse_locs(&xml), vec!["https://a.com/".to_string()]);
    }

    #[test]
    fn test_escaped_entries_parse_back() {
        let xml = render_sitemap(&["https://a.com/shop?a=1&amp;b=2".to_string()]);
        assert_eq!(
            parse_locs(&xml),
            vec!["https://a.com/shop?a=1&b=2".to_string()]
        );
    }

    #[test]
    fn test_envelope() {
        let xml = render_sitemap(&[]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"
        ));
        assert!(xml.trim_end().ends_with("</urlset>"));
        assert!(parse_locs(&xml).is_empty());
    }

    #[test]
    fn test_entries_in_order_without_extra_fields() {
        let entries = vec![
            "https://a.com/".to_string(),
            "https://a.com/b".to_string(),
            "https://a.com/c".to_string(),
        ];
        let xml = render_sitemap(&entries);
        assert_eq!(parse_locs(&xml), entries);
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(!xml.contains("lastmod"));
        assert!(!xml.contains("priority"));
    }
}
