//! Path segment encoding.
//!
//! Identifiers stay readable in a clean url: only the characters that would
//! split or end a segment are escaped. `doc:poème-1` is its own segment,
//! `letters/1910` becomes `letters%2F1910`.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters that break a path segment once composed into a url.
const SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'?');

/// Encode an identifier for use as one path segment.
pub fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii() || c.is_whitespace() || c.is_control() {
            encoded.extend(utf8_percent_encode(c.encode_utf8(&mut buf), SEGMENT));
        } else {
            encoded.push(c);
        }
    }
    encoded
}

/// `None` when the segment does not decode to UTF-8.
pub fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Re-encode every segment of a request path the way [`encode_segment`]
/// does, so `ark%3a1`, `ark%3A1` and `ark:1` all read `ark:1`. Segments that
/// do not decode are kept as they are.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match decode_segment(segment) {
            Some(decoded) => encode_segment(&decoded),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_stay_readable() {
        assert_eq!(encode_segment("doc:poème-1"), "doc:poème-1");
        assert_eq!(encode_segment("ark:/12/x"), "ark:%2F12%2Fx");
        assert_eq!(encode_segment("scan 3?#%"), "scan%203%3F%23%25");
        assert_eq!(encode_segment("a\u{a0}b\n"), "a%C2%A0b%0A");
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("letters%2F1910").as_deref(), Some("letters/1910"));
        assert_eq!(decode_segment("po%c3%a8me").as_deref(), Some("poème"));
        assert_eq!(decode_segment("doc:poème").as_deref(), Some("doc:poème"));
        assert_eq!(decode_segment("%FF"), None);
    }

    #[test]
    fn test_normalize_path() {
        for path in ["ark:1/poem-1", "ark%3a1/poem-1", "ark%3A1/poem-1"] {
            assert_eq!(normalize_path(path), "ark:1/poem-1");
        }
        assert_eq!(normalize_path("a%2fb/po%C3%A8me"), "a%2Fb/poème");
        assert_eq!(normalize_path("%FF/x"), "%FF/x");
    }
}
