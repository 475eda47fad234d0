//! Common test utilities and fixtures

#![allow(dead_code)]

use lowview::search::{
    PageToken, RawSearchItem, SearchError, SearchPage, SearchQuery, Statistics, VideoSource,
};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Test fixture for report output
pub struct TestFixture {
    /// Temporary directory that gets cleaned up automatically
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Names of all files in the fixture directory, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .expect("Failed to read temp dir")
            .map(|e| e.expect("bad dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Build a search item whose title is derived from its id
pub fn item(id: &str) -> RawSearchItem {
    RawSearchItem {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        published_at: "2022-01-01T12:00:00Z".to_string(),
    }
}

/// Statistics with the given view count and a few raw counters
pub fn stats(views: u64) -> Statistics {
    Statistics {
        view_count: Some(views.to_string()),
        like_count: Some("1".to_string()),
        dislike_count: None,
        favorite_count: Some("0".to_string()),
        comment_count: Some("2".to_string()),
    }
}

pub fn page(items: Vec<RawSearchItem>, next: Option<&str>) -> SearchPage {
    SearchPage {
        items,
        next_page_token: next.map(PageToken::new),
    }
}

pub fn query(term: &str) -> SearchQuery {
    SearchQuery::new(term, None, None).expect("valid query")
}

/// In-memory `VideoSource` that replays scripted pages and statistics.
///
/// Every call is recorded so tests can check exactly what was requested.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Result<SearchPage, SearchError>>>,
    statistics: Mutex<HashMap<String, Result<Option<Statistics>, SearchError>>>,
    /// Token passed to each `search_page` call, in order
    pub page_calls: Mutex<Vec<Option<String>>>,
    /// Video id passed to each `statistics` call, in order
    pub stat_calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: SearchPage) -> Self {
        self.pages.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_page_error(self, message: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push_back(Err(SearchError::InvalidResponse(message.to_string())));
        self
    }

    pub fn with_views(self, id: &str, views: u64) -> Self {
        self.statistics
            .lock()
            .unwrap()
            .insert(id.to_string(), Ok(Some(stats(views))));
        self
    }

    pub fn with_statistics(self, id: &str, statistics: Option<Statistics>) -> Self {
        self.statistics
            .lock()
            .unwrap()
            .insert(id.to_string(), Ok(statistics));
        self
    }

    pub fn with_statistics_error(self, id: &str, message: &str) -> Self {
        self.statistics.lock().unwrap().insert(
            id.to_string(),
            Err(SearchError::InvalidResponse(message.to_string())),
        );
        self
    }

    pub fn page_call_count(&self) -> usize {
        self.page_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl VideoSource for ScriptedSource {
    async fn search_page(
        &self,
        _query: &SearchQuery,
        token: Option<&PageToken>,
    ) -> Result<SearchPage, SearchError> {
        self.page_calls
            .lock()
            .unwrap()
            .push(token.map(|t| t.as_str().to_string()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SearchError::InvalidResponse("no more scripted pages".into())))
    }

    async fn statistics(&self, video_id: &str) -> Result<Option<Statistics>, SearchError> {
        self.stat_calls.lock().unwrap().push(video_id.to_string());
        self.statistics
            .lock()
            .unwrap()
            .remove(video_id)
            .unwrap_or(Ok(None))
    }
}
