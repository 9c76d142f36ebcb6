//! Cookie header parsing, independent of any HTTP framework.
//!
//! Works on the raw `Cookie:` request header value so that callers can pass
//! whatever their server hands them and tests can use literal strings.

/// Cookie holding the type tag of the persona the user last switched to.
pub const PERSONA_TYPE_COOKIE: &str = "verso_active_persona_type";

/// Cookie holding the entity id of the persona the user last switched to.
pub const PERSONA_ID_COOKIE: &str = "verso_active_persona_id";

/// Iterate over the `(key, value)` pairs of a raw cookie header.
///
/// Pairs are separated by `;`. Surrounding whitespace is trimmed from each
/// pair and from its key. The value is everything after the first `=`,
/// so values may themselves contain `=`. Segments without `=` are skipped.
pub fn cookie_pairs(raw_header: &str) -> impl Iterator<Item = (&str, &str)> {
    raw_header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim(), value))
}

/// Return the value of the first cookie whose key is exactly `name`.
///
/// The value is returned verbatim: no unquoting, no percent-decoding.
pub fn read_cookie_value<'a>(raw_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_pairs(raw_header)
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
