pub mod dates;
pub mod providers;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of search pages and per-video statistics.
///
/// The aggregator only talks to this trait, so the HTTP provider can be
/// swapped for an in-memory one in tests.
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch one page of search results, starting at `token` when given.
    async fn search_page(
        &self,
        query: &SearchQuery,
        token: Option<&PageToken>,
    ) -> Result<SearchPage, SearchError>;

    /// Fetch statistics for a single video.
    ///
    /// Returns `Ok(None)` when the provider answers successfully but knows
    /// nothing about the video (deleted, private, ...).
    async fn statistics(&self, video_id: &str) -> Result<Option<Statistics>, SearchError>;
}

/// A search request: the term plus optional inclusive publish bounds.
///
/// Bounds are stored already formatted as provider timestamps. No check is
/// made that `after` precedes `before`; a contradictory range is left to the
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl SearchQuery {
    /// Build a query from a term and optional `YYYY-MM-DD` dates.
    pub fn new(
        term: impl Into<String>,
        after_date: Option<&str>,
        before_date: Option<&str>,
    ) -> Result<Self, SearchError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        Ok(Self {
            term,
            after: dates::format_bound(after_date),
            before: dates::format_bound(before_date),
        })
    }
}

/// Opaque continuation cursor issued by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One video from a search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSearchItem {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<RawSearchItem>,
    /// `None` on the last page
    pub next_page_token: Option<PageToken>,
}

/// Counters reported by the statistics endpoint.
///
/// The provider sends every counter as a decimal string. They are kept in
/// that raw form; only the view count is parsed (see [`Statistics::views`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub dislike_count: Option<String>,
    #[serde(default)]
    pub favorite_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

impl Statistics {
    /// View count as an integer, `None` if missing or not a number.
    pub fn views(&self) -> Option<u64> {
        self.view_count.as_deref()?.trim().parse().ok()
    }
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The provider rejected the request or returned something unusable.
    #[error("{0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Search term must not be empty")]
    EmptyTerm,
}
