//! Text helpers for normalizing search results and keeping logs readable.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Strip markup tags and unescape the entities Naver leaves in titles and
/// descriptions.
///
/// Only `&quot;` and `&amp;` are decoded; other entities pass through.
/// `&amp;` is decoded last so `&amp;quot;` becomes the literal `&quot;`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_markup("<b>A &quot;B&quot; &amp; C</b>"), "A \"B\" & C");
/// ```
pub fn strip_markup(s: &str) -> String {
    TAG_RE
        .replace_all(s, "")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backed off to a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
