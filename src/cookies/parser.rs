//! Parsing of raw `document.cookie` strings.

use crate::base::cookieerror::{CookieError, Result};
use cookie::Cookie;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Parse a raw cookie string (`name1=value1; name2=value2`) into a map.
///
/// Segments are trimmed and empty segments skipped. Each segment is split on
/// the first `=` and both halves are percent-decoded, with invalid UTF-8
/// replaced by U+FFFD. Names and values are not otherwise validated, so a
/// foreign cookie with an odd name never hides the rest. Later duplicates win.
/// A segment without `=` is a [`CookieError::MalformedCookieSegment`].
pub fn parse_cookies(raw: &str) -> Result<HashMap<String, String>> {
    let mut cookies = HashMap::new();

    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some((name, value)) = part.split_once('=') else {
            return Err(CookieError::malformed_segment(part, "missing '='"));
        };

        cookies.insert(decode(name), decode(value));
    }

    Ok(cookies)
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Render a single `name=value` pair the way the client component writes it.
pub fn encode_pair(name: &str, value: &str) -> String {
    Cookie::new(name, value).encoded().stripped().to_string()
}
