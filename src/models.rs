//! Data models for search results and relayed articles.
//!
//! - [`RawNewsItem`]: one record of the Naver search response, as received
//! - [`Article`]: a normalized, timestamped item ready for delivery
//! - [`StateRecord`]: the persisted watermark document

use crate::error::FormatError;
use crate::pubdate;
use crate::utils::strip_markup;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level body of `GET /v1/search/news.json`.
///
/// Paging metadata (`total`, `start`, `display`) is ignored; only one page is
/// ever read.
#[derive(Debug, Deserialize)]
pub struct NewsSearchResponse {
    #[serde(default)]
    pub items: Vec<RawNewsItem>,
}

/// A single search hit before normalization.
///
/// Field names follow the Naver wire format, hence the renames.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsItem {
    /// Headline with `<b>` highlight tags and HTML entities.
    #[serde(default)]
    pub title: Option<String>,
    /// Snippet with the same markup as `title`.
    #[serde(default)]
    pub description: Option<String>,
    /// Naver redirect URL.
    #[serde(default)]
    pub link: Option<String>,
    /// Publisher's canonical URL.
    #[serde(default, rename = "originallink")]
    pub original_link: Option<String>,
    /// RFC 2822-style publish time, e.g. `"Mon, 15 Dec 2025 12:34:56 +0900"`.
    /// Absent or `null` surfaces as a [`FormatError`] in [`Article::from_raw`].
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
}

/// A normalized article. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: DateTime<FixedOffset>,
    /// `pubDate` exactly as the API sent it; becomes the next watermark.
    pub pub_date_raw: String,
}

impl Article {
    /// Normalize a raw search hit.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if `pubDate` is missing or does not parse.
    pub fn from_raw(raw: &RawNewsItem) -> Result<Self, FormatError> {
        let pub_date = raw.pub_date.as_deref().unwrap_or_default();
        let published = pubdate::parse(pub_date)?;
        Ok(Self {
            title: strip_markup(raw.title.as_deref().unwrap_or_default()),
            description: strip_markup(raw.description.as_deref().unwrap_or_default()),
            link: resolve_link(raw),
            published,
            pub_date_raw: pub_date.to_string(),
        })
    }

    /// Render the chat message for this article.
    ///
    /// ```text
    /// [keyword] title
    /// 2025-12-15 09:00:00 +0900
    /// link
    ///
    /// description
    /// ```
    pub fn message(&self, keyword: &str) -> String {
        format!(
            "[{}] {}\n{}\n{}\n\n{}",
            keyword,
            self.title,
            pubdate::format(&self.published),
            self.link,
            self.description
        )
    }
}

/// Canonical link if present and non-empty, else the redirect link, else "".
fn resolve_link(raw: &RawNewsItem) -> String {
    [&raw.original_link, &raw.link]
        .into_iter()
        .flatten()
        .find(|l| !l.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// On-disk watermark document.
///
/// `last_pubdate` is serialized as `null` before the first delivery. Any other
/// keys found in the file are carried through `extra` and written back.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StateRecord {
    #[serde(default)]
    pub last_pubdate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
