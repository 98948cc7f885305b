//! Parsing and rendering of Naver `pubDate` timestamps.
//!
//! Naver emits RFC 2822-style strings such as `"Mon, 15 Dec 2025 12:34:56 +0900"`.
//! The offset is a literal number, so values are kept as
//! `DateTime<FixedOffset>` and rendered back in the offset they arrived with.

use crate::error::FormatError;
use chrono::{DateTime, FixedOffset, Weekday};

/// `strptime`-style pattern of the `pubDate` field.
pub const PUBDATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`PUBDATE_FORMAT`] without the leading day name.
const DATE_PART_FORMAT: &str = "%d %b %Y %H:%M:%S %z";

/// Pattern used for the timestamp line of a delivered message.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse a `pubDate` string, preserving its UTC offset.
///
/// The day name must be present and must name a weekday, but it is not
/// checked against the date: `"Tue, 15 Dec 2025 ..."` is accepted as the
/// Monday it actually is.
///
/// # Errors
///
/// Returns [`FormatError`] when the text does not match [`PUBDATE_FORMAT`] or
/// carries an out-of-range component (day 32, offset beyond ±24h).
pub fn parse(text: &str) -> Result<DateTime<FixedOffset>, FormatError> {
    let parsed = match text.split_once(", ") {
        Some((day, rest)) if day.parse::<Weekday>().is_ok() => {
            DateTime::parse_from_str(rest, DATE_PART_FORMAT)
        }
        // malformed day name: the full pattern fails and reports why
        _ => DateTime::parse_from_str(text, PUBDATE_FORMAT),
    };
    parsed.map_err(|source| FormatError {
        text: text.to_string(),
        source,
    })
}

/// Render as `YYYY-MM-DD HH:MM:SS ±HHMM` in the timestamp's own offset.
pub fn format(dt: &DateTime<FixedOffset>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}
