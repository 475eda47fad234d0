//! Paging, enrichment and filtering of search results.
//!
//! [`ResultAggregator`] walks every search page in order, looks up
//! statistics for each video and keeps the ones at or under the view
//! threshold. A failure at any point ends the walk but never discards the
//! records gathered before it.

use crate::search::{PageToken, RawSearchItem, SearchError, SearchQuery, Statistics, VideoSource};
use serde::Serialize;

/// Default inclusive upper bound on view count
pub const DEFAULT_MAX_VIEW_COUNT: u64 = 100;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A search result merged with its statistics.
///
/// Field order is the column order of the CSV report. Only the view count is
/// parsed; the other counters stay in the provider's string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    pub title: String,
    pub publish_date: String,
    pub view_count: u64,
    pub like_count: Option<String>,
    pub dislike_count: Option<String>,
    pub favorite_count: Option<String>,
    pub comment_count: Option<String>,
    pub url: String,
}

impl EnrichedRecord {
    fn new(item: &RawSearchItem, statistics: Statistics, view_count: u64) -> Self {
        Self {
            title: item.title.clone(),
            publish_date: item.published_at.clone(),
            view_count,
            like_count: statistics.like_count,
            dislike_count: statistics.dislike_count,
            favorite_count: statistics.favorite_count,
            comment_count: statistics.comment_count,
            url: watch_url(&item.video_id),
        }
    }
}

/// Public watch page for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL}{video_id}")
}

/// Inclusion rule: statistics must be present with a numeric view count no
/// greater than `max_view_count`. Returns the view count when included.
pub fn included_views(statistics: Option<&Statistics>, max_view_count: u64) -> Option<u64> {
    statistics?.views().filter(|views| *views <= max_view_count)
}

/// Progress notifications emitted while paging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// About to request a page (`None` for the first one)
    FetchingPage { token: Option<PageToken> },
    /// A page has been fully processed
    PageDone {
        page: usize,
        items: usize,
        total_records: usize,
    },
}

/// Records gathered by one run, plus the error that stopped it early (if any)
#[derive(Debug)]
pub struct AggregateOutcome {
    pub records: Vec<EnrichedRecord>,
    pub error: Option<SearchError>,
    /// Number of search pages successfully fetched
    pub pages_fetched: usize,
}

impl AggregateOutcome {
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// Drives a [`VideoSource`] across all pages of a query.
pub struct ResultAggregator<'a, S: VideoSource + ?Sized> {
    source: &'a S,
    max_view_count: u64,
}

impl<'a, S: VideoSource + ?Sized> ResultAggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_view_count: DEFAULT_MAX_VIEW_COUNT,
        }
    }

    pub fn with_max_view_count(mut self, max_view_count: u64) -> Self {
        self.max_view_count = max_view_count;
        self
    }

    pub fn max_view_count(&self) -> u64 {
        self.max_view_count
    }

    /// Run the query to completion without progress reporting
    pub async fn run(&self, query: &SearchQuery) -> AggregateOutcome {
        self.run_with_progress(query, |_| {}).await
    }

    /// Run the query, reporting progress through `on_progress`.
    ///
    /// Pages are fetched one at a time until the provider stops returning a
    /// continuation token. Output order is discovery order.
    pub async fn run_with_progress<F>(
        &self,
        query: &SearchQuery,
        mut on_progress: F,
    ) -> AggregateOutcome
    where
        F: FnMut(ProgressEvent),
    {
        let mut records: Vec<EnrichedRecord> = Vec::new();
        let mut token: Option<PageToken> = None;
        let mut pages_fetched = 0usize;

        loop {
            on_progress(ProgressEvent::FetchingPage {
                token: token.clone(),
            });

            let page = match self.source.search_page(query, token.as_ref()).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        query = %query.term,
                        page = pages_fetched + 1,
                        error = %e,
                        "search page failed, stopping with partial results"
                    );
                    return AggregateOutcome {
                        records,
                        error: Some(e),
                        pages_fetched,
                    };
                }
            };
            pages_fetched += 1;

            let item_count = page.items.len();
            for item in &page.items {
                match self.enrich(item).await {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            video_id = %item.video_id,
                            error = %e,
                            "statistics lookup failed, stopping with partial results"
                        );
                        return AggregateOutcome {
                            records,
                            error: Some(e),
                            pages_fetched,
                        };
                    }
                }
            }

            tracing::debug!(
                page = pages_fetched,
                items = item_count,
                total_records = records.len(),
                "page processed"
            );
            on_progress(ProgressEvent::PageDone {
                page: pages_fetched,
                items: item_count,
                total_records: records.len(),
            });

            match page.next_page_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        tracing::info!(
            query = %query.term,
            pages = pages_fetched,
            records = records.len(),
            "search finished"
        );

        AggregateOutcome {
            records,
            error: None,
            pages_fetched,
        }
    }

    /// Look up statistics for one item and build a record if it passes the filter
    async fn enrich(&self, item: &RawSearchItem) -> Result<Option<EnrichedRecord>, SearchError> {
        let Some(statistics) = self.source.statistics(&item.video_id).await? else {
            tracing::trace!(video_id = %item.video_id, "excluded, no statistics");
            return Ok(None);
        };

        let Some(view_count) = included_views(Some(&statistics), self.max_view_count) else {
            tracing::trace!(
                video_id = %item.video_id,
                view_count = ?statistics.views(),
                "excluded, over threshold"
            );
            return Ok(None);
        };

        Ok(Some(EnrichedRecord::new(item, statistics, view_count)))
    }
}
