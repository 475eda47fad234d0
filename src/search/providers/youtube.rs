use crate::config::Config;
use crate::search::{
    PageToken, RawSearchItem, SearchError, SearchPage, SearchQuery, Statistics, VideoSource,
};
use serde::Deserialize;
use std::time::Duration;

/// Fixed page size for search requests (the API maximum)
pub const PAGE_SIZE: u32 = 50;

const GENERIC_ERROR: &str = "Invalid response from YouTube API";

/// YouTube Data API v3 provider
///
/// Search docs: https://developers.google.com/youtube/v3/docs/search/list
/// Videos docs: https://developers.google.com/youtube/v3/docs/videos/list
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchListItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchListItem {
    #[serde(default)]
    id: Option<SearchItemId>,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "publishedAt")]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Option<Vec<VideoListItem>>,
}

#[derive(Debug, Deserialize)]
struct VideoListItem {
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl YouTubeClient {
    pub const DEFAULT_API_BASE: &'static str = "https://www.googleapis.com/youtube/v3";

    /// Create a client with the given key and per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Ok(
            Self::new(config.api_key.clone(), Duration::from_secs(config.request_timeout_secs))?
                .with_api_base(config.api_base.clone()),
        )
    }

    /// Point the client at a different endpoint base (mock servers in tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Query parameters for one search page.
    ///
    /// Safe search is always relaxed to `none`. Bounds and the page token are
    /// only sent when present.
    fn search_params(
        &self,
        query: &SearchQuery,
        token: Option<&PageToken>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("part", "snippet".to_string()),
            ("q", query.term.clone()),
            ("maxResults", PAGE_SIZE.to_string()),
            ("type", "video".to_string()),
            ("safeSearch", "none".to_string()),
        ];
        if let Some(token) = token {
            params.push(("pageToken", token.as_str().to_string()));
        }
        if let Some(after) = &query.after {
            params.push(("publishedAfter", after.clone()));
        }
        if let Some(before) = &query.before {
            params.push(("publishedBefore", before.clone()));
        }
        params
    }

    /// Issue a GET and return the body of a successful response.
    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, SearchError> {
        let url = format!("{}/{}", self.api_base, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!(endpoint = %endpoint, "youtube request timed out");
                    SearchError::InvalidResponse(format!("Request to {endpoint} timed out"))
                } else {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %crate::logging::redact_secrets(&e.to_string()),
                        "youtube request failed"
                    );
                    SearchError::Network(e.without_url())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::InvalidResponse(format!("Request to {endpoint} timed out"))
            } else {
                SearchError::Network(e.without_url())
            }
        })?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                endpoint = %endpoint,
                error = %crate::logging::redact_secrets(&body),
                "youtube api error"
            );
            return Err(SearchError::InvalidResponse(error_message(&body)));
        }

        tracing::trace!(endpoint = %endpoint, bytes = body.len(), "youtube response received");
        Ok(body)
    }
}

/// Pull `error.message` out of an error envelope, or fall back to a generic message
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

fn parse_body<T: serde::de::DeserializeOwned>(
    body: &str,
    endpoint: &str,
) -> Result<T, SearchError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(endpoint = %endpoint, error = %e, "failed to parse youtube response");
        SearchError::InvalidResponse(format!("{GENERIC_ERROR}: {e}"))
    })
}

#[async_trait::async_trait]
impl VideoSource for YouTubeClient {
    async fn search_page(
        &self,
        query: &SearchQuery,
        token: Option<&PageToken>,
    ) -> Result<SearchPage, SearchError> {
        tracing::debug!(
            query = %query.term,
            after = ?query.after,
            before = ?query.before,
            token = ?token.map(PageToken::as_str),
            "performing youtube search"
        );

        let params = self.search_params(query, token);
        let body = self.get("search", &params).await?;
        let response: SearchListResponse = parse_body(&body, "search")?;

        let items: Vec<RawSearchItem> = response
            .items
            .into_iter()
            .filter_map(|item| match item.id.and_then(|id| id.video_id) {
                Some(video_id) => Some(RawSearchItem {
                    video_id,
                    title: item.snippet.title,
                    published_at: item.snippet.published_at,
                }),
                None => {
                    tracing::debug!("skipping search result without a video id");
                    None
                }
            })
            .collect();

        tracing::debug!(
            query = %query.term,
            result_count = items.len(),
            has_next = response.next_page_token.is_some(),
            "youtube search page completed"
        );

        Ok(SearchPage {
            items,
            next_page_token: response.next_page_token.map(PageToken::new),
        })
    }

    async fn statistics(&self, video_id: &str) -> Result<Option<Statistics>, SearchError> {
        let params = [
            ("key", self.api_key.clone()),
            ("part", "statistics".to_string()),
            ("id", video_id.to_string()),
        ];
        let body = self.get("videos", &params).await?;
        let response: VideoListResponse = parse_body(&body, "videos")?;

        let statistics = response
            .items
            .and_then(|items| items.into_iter().next())
            .and_then(|item| item.statistics);

        if statistics.is_none() {
            tracing::debug!(video_id = %video_id, "no statistics returned for video");
        }

        Ok(statistics)
    }
}
