use crate::url::encode::encode_link;
use crate::url::origin::OriginContext;
use crate::url::registry::DedupRegistry;

/// Why an href was not accepted into the frontier
///
/// A rejection is a normal filtering outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The href attribute was missing or empty
    Empty,
    /// The exact href string was seen before
    DuplicateHref,
    /// The href points at a different host
    OffOrigin,
    /// Relative paths, `mailto:`, `javascript:`, fragments and the like
    Unsupported,
    /// A different href already resolved to the same URL
    DuplicateUrl,
}

/// Outcome of validating a single href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// In scope and never seen before; carries the resolved, encoded URL
    Accepted(String),
    Rejected(Rejection),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The resolved URL, if the href was accepted
    pub fn resolved_url(&self) -> Option<&str> {
        match self {
            Self::Accepted(url) => Some(url),
            Self::Rejected(_) => None,
        }
    }
}

/// Decides whether a raw href is an in-scope link and resolves it
///
/// # Rules
///
/// 1. Empty hrefs and hrefs seen before are rejected; new hrefs are recorded
/// 2. `http…` and `//…` hrefs: the text after the first `//` is host+path.
///    The href is accepted only if its host equals the origin host, and the
///    origin scheme replaces whatever scheme the href used
/// 3. `/…` hrefs resolve against the origin host
/// 4. Everything else is rejected
/// 5. The rebuilt URL is percent-encoded, then rejected if another href
///    already resolved to it
///
/// Host comparison is an exact string match; ports are part of the host
/// string and schemes are ignored.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::{validate_href, DedupRegistry, OriginContext};
///
/// let origin = OriginContext::new("a.com", "https");
/// let mut registry = DedupRegistry::new();
///
/// let result = validate_href(Some("http://a.com/x"), &origin, &mut registry);
/// assert_eq!(result.resolved_url(), Some("https://a.com/x"));
///
/// let again = validate_href(Some("http://a.com/x"), &origin, &mut registry);
/// assert!(!again.is_accepted());
/// ```
pub fn validate_href(
    raw: Option<&str>,
    origin: &OriginContext,
    registry: &mut DedupRegistry,
) -> Validation {
    let href = match raw {
        Some(href) if !href.is_empty() => href,
        _ => return Validation::Rejected(Rejection::Empty),
    };

    if !registry.mark_href(href) {
        return Validation::Rejected(Rejection::DuplicateHref);
    }

    let rebuilt = if href.starts_with("http") || href.starts_with("//") {
        let Some((_, host_and_path)) = href.split_once("//") else {
            return Validation::Rejected(Rejection::Unsupported);
        };
        let candidate_host = host_and_path.split('/').next().unwrap_or_default();
        if candidate_host != origin.host() {
            return Validation::Rejected(Rejection::OffOrigin);
        }
        origin.absolute(host_and_path)
    } else if href.starts_with('/') {
        origin.absolute(&format!("{}{}", origin.host(), href))
    } else {
        return Validation::Rejected(Rejection::Unsupported);
    };

    let encoded = encode_link(&rebuilt);

    if !registry.mark_url(&encoded) {
        return Validation::Rejected(Rejection::DuplicateUrl);
    }

    Validation::Accepted(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> OriginContext {
        OriginContext::new("a.com", "https")
    }

    fn validate(href: &str, registry: &mut DedupRegistry) -> Validation {
        validate_href(Some(href), &origin(), registry)
    }

    #[test]
    fn test_same_href_twice_rejected() {
        for href in ["/x", "https://a.com/y", "//a.com/z", "mailto:me@a.com", "other"] {
            let mut registry = DedupRegistry::new();
            validate(href, &mut registry);
            assert_eq!(
                validate(href, &mut registry),
                Validation::Rejected(Rejection::DuplicateHref),
                "second validation of {} must be rejected",
                href
            );
        }
    }

    #[test]
    fn test_off_origin_rejected() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("http://other.com/x", &mut registry),
            Validation::Rejected(Rejection::OffOrigin)
        );
        assert_eq!(
            validate("//cdn.a.com/x", &mut registry),
            Validation::Rejected(Rejection::OffOrigin)
        );
    }

    #[test]
    fn test_port_is_part_of_host() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("https://a.com:8080/x", &mut registry),
            Validation::Rejected(Rejection::OffOrigin)
        );
    }

    #[test]
    fn test_absolute_path_resolves_against_origin() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("/x", &mut registry),
            Validation::Accepted("https://a.com/x".to_string())
        );
    }

    #[test]
    fn test_scheme_override() {
        let mut registry = DedupRegistry::new();
        let result = validate("http://a.com/x", &mut registry);
        assert!(result.resolved_url().unwrap().starts_with("https://"));
    }

    #[test]
    fn test_protocol_relative() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("//a.com/docs/intro", &mut registry),
            Validation::Accepted("https://a.com/docs/intro".to_string())
        );
    }

    #[test]
    fn test_bare_host() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("https://a.com", &mut registry),
            Validation::Accepted("https://a.com".to_string())
        );
    }

    #[test]
    fn test_full_path_kept_after_double_slash() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("https://a.com/x//y", &mut registry),
            Validation::Accepted("https://a.com/x//y".to_string())
        );
    }

    #[test]
    fn test_unsupported_forms_rejected() {
        let mut registry = DedupRegistry::new();
        for href in [
            "relative/page",
            "mailto:me@a.com",
            "javascript:void(0)",
            "#top",
            "?q=1",
            "httpfoo",
        ] {
            assert_eq!(
                validate(href, &mut registry),
                Validation::Rejected(Rejection::Unsupported),
                "{} must be unsupported",
                href
            );
        }
    }

    #[test]
    fn test_empty_and_missing() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate_href(None, &origin(), &mut registry),
            Validation::Rejected(Rejection::Empty)
        );
        assert_eq!(
            validate("", &mut registry),
            Validation::Rejected(Rejection::Empty)
        );
        assert_eq!(registry.href_count(), 0);
    }

    #[test]
    fn test_different_hrefs_same_url() {
        let mut registry = DedupRegistry::new();
        assert!(validate("/x", &mut registry).is_accepted());
        assert_eq!(
            validate("http://a.com/x", &mut registry),
            Validation::Rejected(Rejection::DuplicateUrl)
        );
        assert_eq!(
            validate("//a.com/x", &mut registry),
            Validation::Rejected(Rejection::DuplicateUrl)
        );
    }

    #[test]
    fn test_resolved_url_is_encoded() {
        let mut registry = DedupRegistry::new();
        assert_eq!(
            validate("/a page", &mut registry),
            Validation::Accepted("https://a.com/a%20page".to_string())
        );
        // The encoded form was recorded, so the pre-encoded href collides
        assert_eq!(
            validate("/a%20page", &mut registry),
            Validation::Rejected(Rejection::DuplicateUrl)
        );
    }

    #[test]
    fn test_seeded_registry_rejects_seed() {
        let mut registry = DedupRegistry::seeded("https://a.com/");
        assert_eq!(
            validate("/", &mut registry),
            Validation::Rejected(Rejection::DuplicateUrl)
        );
    }
}
