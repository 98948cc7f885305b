//! News search source.
//!
//! [`NewsSource`] is the seam the engine pulls candidates through;
//! [`NaverNewsClient`] implements it against the Naver Open API
//! (`GET /v1/search/news.json`). One page is read per run.

use crate::error::FetchError;
use crate::models::{NewsSearchResponse, RawNewsItem};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Result ordering offered by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent first.
    Date,
    /// Relevance.
    Sim,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Date => "date",
            SortOrder::Sim => "sim",
        }
    }
}

/// Largest page size the search endpoint accepts.
pub const MAX_DISPLAY: u32 = 100;

/// Parameters of one search request.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub keyword: String,
    /// Page size (`display`).
    pub display: u32,
    /// 1-based offset of the first result.
    pub start: u32,
    pub sort: SortOrder,
}

/// Supplies an unordered batch of candidate articles.
pub trait NewsSource {
    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<RawNewsItem>, FetchError>;
}

/// Naver Open API credentials.
#[derive(Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// [`NewsSource`] backed by the Naver news search endpoint.
#[derive(Debug, Clone)]
pub struct NaverNewsClient {
    http: Client,
    endpoint: Url,
    credentials: NaverCredentials,
}

impl NaverNewsClient {
    /// Build a client rooted at `api_base` (e.g. `https://openapi.naver.com`).
    pub fn new(
        api_base: &Url,
        credentials: NaverCredentials,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, api_base, credentials))
    }

    /// Use an already configured HTTP client.
    pub fn with_client(http: Client, api_base: &Url, credentials: NaverCredentials) -> Self {
        Self {
            http,
            endpoint: search_endpoint(api_base),
            credentials,
        }
    }
}

/// `{base}/v1/search/news.json`, keeping any path prefix on `base`.
fn search_endpoint(base: &Url) -> Url {
    let mut url = base.clone();
    let path = format!("{}/v1/search/news.json", base.path().trim_end_matches('/'));
    url.set_path(&path);
    url
}

impl NewsSource for NaverNewsClient {
    #[instrument(level = "info", skip_all, fields(keyword = %query.keyword, display = query.display))]
    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<RawNewsItem>, FetchError> {
        let t0 = Instant::now();
        let display = query.display.to_string();
        let start = query.start.to_string();

        let resp = self
            .http
            .get(self.endpoint.clone())
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .query(&[
                ("query", query.keyword.as_str()),
                ("display", display.as_str()),
                ("start", start.as_str()),
                ("sort", query.sort.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "News search failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: NewsSearchResponse = serde_json::from_str(&body)?;
        info!(
            count = parsed.items.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched news search results"
        );
        debug!(items = ?parsed.items, "Search items");
        Ok(parsed.items)
    }
}
