//! Incremental delivery engine.
//!
//! One run loads the watermark, fetches a page of candidates, keeps the ones
//! published strictly after the watermark, sends them oldest first and then
//! advances the watermark to the newest delivered `pubDate`.
//!
//! ```text
//! Idle -> WatermarkLoaded -> CandidatesFetched -> Classified
//!      -> Empty -> Done
//!      -> Delivering -> AllSent -> WatermarkSaved -> Done
//! ```
//!
//! The watermark is written once, after every send succeeded. A failed send
//! leaves it untouched, so the whole batch is retried by the next run
//! (at-least-once delivery).

use crate::error::{FormatError, RunError};
use crate::models::{Article, RawNewsItem};
use crate::notifier::Notifier;
use crate::pubdate;
use crate::source::{NewsQuery, NewsSource, SortOrder};
use crate::state::WatermarkStore;
use tracing::{debug, info, instrument};

/// What to search for and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// Search query and message prefix.
    pub keyword: String,
    /// Page size requested from the source.
    pub display: u32,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing newer than the watermark; the store was not written.
    NoNewItems,
    /// `count` articles were sent and the watermark moved to `last_pubdate`.
    Delivered { count: usize, last_pubdate: String },
}

impl RunOutcome {
    pub fn delivered(&self) -> usize {
        match self {
            RunOutcome::NoNewItems => 0,
            RunOutcome::Delivered { count, .. } => *count,
        }
    }
}

/// Normalize `candidates`, keep those newer than `watermark`, and order them
/// oldest first.
///
/// An article is new iff there is no watermark or its `pubDate` is strictly
/// later than the watermark; an equal timestamp is not new. The sort is
/// stable, so items with identical timestamps keep their source order.
///
/// # Errors
///
/// Returns [`FormatError`] if the watermark or any candidate's `pubDate`
/// fails to parse. No candidate is skipped.
pub fn select_and_order(
    candidates: &[RawNewsItem],
    watermark: Option<&str>,
) -> Result<Vec<Article>, FormatError> {
    let last_dt = watermark.map(pubdate::parse).transpose()?;

    let mut fresh = Vec::new();
    for raw in candidates {
        let article = Article::from_raw(raw)?;
        match last_dt {
            Some(last) if article.published <= last => {
                debug!(pub_date = %article.pub_date_raw, "Already delivered; skipping");
            }
            _ => fresh.push(article),
        }
    }

    fresh.sort_by_key(|a| a.published);
    Ok(fresh)
}

/// Drives one relay run over its three collaborators.
#[derive(Debug)]
pub struct DeliveryEngine<S, N, W> {
    settings: RelaySettings,
    source: S,
    notifier: N,
    store: W,
}

impl<S, N, W> DeliveryEngine<S, N, W>
where
    S: NewsSource,
    N: Notifier,
    W: WatermarkStore,
{
    pub fn new(settings: RelaySettings, source: S, notifier: N, store: W) -> Self {
        Self {
            settings,
            source,
            notifier,
            store,
        }
    }

    /// The single query every run issues: newest first, first page.
    pub fn query(&self) -> NewsQuery {
        NewsQuery {
            keyword: self.settings.keyword.clone(),
            display: self.settings.display,
            start: 1,
            sort: SortOrder::Date,
        }
    }

    /// Load the watermark, fetch candidates, and deliver whatever is new.
    #[instrument(level = "info", skip_all, fields(keyword = %self.settings.keyword))]
    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        let watermark = self.store.load().await?;
        info!(last_pubdate = ?watermark, "Watermark loaded");

        let candidates = self.source.fetch(&self.query()).await?;
        info!(count = candidates.len(), "Candidates fetched");

        self.deliver(&candidates, watermark.as_deref()).await
    }

    /// Classify `candidates` against `watermark`, send the new ones in
    /// chronological order, and persist the advanced watermark.
    ///
    /// The first send failure aborts the run with the watermark unchanged.
    pub async fn deliver(
        &self,
        candidates: &[RawNewsItem],
        watermark: Option<&str>,
    ) -> Result<RunOutcome, RunError> {
        let batch = select_and_order(candidates, watermark)?;
        info!(
            candidates = candidates.len(),
            new = batch.len(),
            "Classified candidates"
        );

        let Some(newest) = batch.last() else {
            return Ok(RunOutcome::NoNewItems);
        };

        for (i, article) in batch.iter().enumerate() {
            let message = article.message(&self.settings.keyword);
            self.notifier.send(&message).await?;
            debug!(index = i, pub_date = %article.pub_date_raw, "Sent article");
        }

        let last_pubdate = newest.pub_date_raw.clone();
        self.store.save(&last_pubdate).await?;

        Ok(RunOutcome::Delivered {
            count: batch.len(),
            last_pubdate,
        })
    }
}
