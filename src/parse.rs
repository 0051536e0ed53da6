//! Query-string and `Cookie` header parsing.
//!
//! Both parsers are permissive: a fragment that cannot be understood is
//! dropped, never reported. Duplicate keys keep the last value.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Parses the part of a URI after `?` into a key/value map.
///
/// Pairs are split on `&`, then on the first `=`. Both sides are
/// percent-decoded and `+` decodes to a space. A key without `=` maps to an
/// empty string.
///
/// ```rust
/// let q = wicket::parse_query("invoiceID=99&flag&name=a+b%21");
/// assert_eq!(q["invoiceID"], "99");
/// assert_eq!(q["flag"], "");
/// assert_eq!(q["name"], "a b!");
/// ```
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut out = HashMap::new();
    for pair in raw.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        out.insert(key, decode_component(value));
    }
    out
}

/// Parses a `Cookie` header value into a name/value map.
///
/// Pairs are split on `;`, then on the first `=`, with surrounding
/// whitespace trimmed. Values are kept verbatim.
///
/// ```rust
/// let c = wicket::parse_cookies("pass=1234567890; theme ;=orphan");
/// assert_eq!(c["pass"], "1234567890");
/// assert_eq!(c["theme"], "");
/// assert_eq!(c.len(), 2);
/// ```
pub fn parse_cookies(raw: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    extend_cookies(&mut out, raw);
    out
}

/// Same as [`parse_cookies`] but merges into an existing map, so several
/// `Cookie` headers on one request can be folded in order.
pub(crate) fn extend_cookies(out: &mut HashMap<String, String>, raw: &str) {
    for pair in raw.split(';') {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        out.insert(name.to_owned(), value.trim().to_owned());
    }
}

fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
