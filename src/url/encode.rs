use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a resolved URL is made safe for use as a link
///
/// This is the complement of the reserved and unreserved URI characters:
/// everything `encodeURI` would leave alone stays as is, including `#`, `?`
/// and `&`. Non-ASCII input is always UTF-8 percent-encoded.
const LINK_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encodes a URL for safe use as a link
///
/// Existing `%XX` escapes are copied through untouched; a stray `%` that does
/// not start an escape is encoded as `%25`.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::encode_link;
///
/// assert_eq!(encode_link("https://a.com/a b"), "https://a.com/a%20b");
/// assert_eq!(encode_link("https://a.com/a%20b"), "https://a.com/a%20b");
/// assert_eq!(encode_link("https://a.com/100%"), "https://a.com/100%25");
/// ```
pub fn encode_link(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('%') {
        let (head, tail) = rest.split_at(idx);
        out.extend(utf8_percent_encode(head, LINK_UNSAFE));

        if is_escape(tail) {
            out.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }

    out.extend(utf8_percent_encode(rest, LINK_UNSAFE));
    out
}

/// Decodes a link for human-readable progress output
pub fn decode_for_display(url: &str) -> String {
    percent_decode_str(url).decode_utf8_lossy().into_owned()
}

fn is_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}
