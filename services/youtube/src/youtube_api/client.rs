//! Core YouTube API client functionality.

use crate::error::UpstreamError;
use crate::youtube_api::{
    channels::{ChannelListResponse, ChannelSnippet},
    search::{SearchListResponse, SearchResult},
    videos::{Video, VideoListResponse},
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

/// Default base URL of the YouTube Data API v3.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// The `channels.list` endpoint accepts at most this many IDs per call.
const MAX_CHANNEL_IDS_PER_REQUEST: usize = 50;

/// The three read-only YouTube operations this service depends on.
///
/// [`YouTubeClient`] is the real implementation; tests substitute an in-memory one.
pub trait Upstream: Send + Sync + 'static {
    /// Searches for videos that are currently live.
    fn search_live_videos(
        &self,
        region_code: &str,
        query: &str,
        max_results: u32,
    ) -> impl Future<Output = Result<Vec<SearchResult>, UpstreamError>> + Send;

    /// Fetches the snippet and live-streaming details of one video.
    ///
    /// Returns `Ok(None)` if YouTube knows no video with that ID.
    fn get_video_details(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Option<Video>, UpstreamError>> + Send;

    /// Fetches channel snippets for the given IDs, keyed by channel ID.
    ///
    /// Unknown IDs are absent from the returned map.
    fn get_channel_snippets(
        &self,
        channel_ids: &[String],
    ) -> impl Future<Output = Result<HashMap<String, ChannelSnippet>, UpstreamError>> + Send;
}

/// Client for the public (API-key authenticated) parts of the YouTube Data API v3.
#[derive(Clone)]
pub struct YouTubeClient {
    /// API key sent as the `key` query parameter on every request.
    api_key: Arc<str>,
    /// Base URL without trailing slash.
    base_url: Arc<str>,
    /// HTTP client for API requests
    client: reqwest::Client,
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - A YouTube Data API key
    /// * `base_url` - API root, normally [`DEFAULT_API_BASE`]
    /// * `client` - Shared HTTP client for making API requests
    pub fn new(api_key: impl Into<String>, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key: Arc::from(api_key.into()),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            client,
        }
    }

    /// Makes a GET request to a YouTube API endpoint and parses the JSON response.
    ///
    /// Any non-2xx status is turned into [`UpstreamError::Status`] carrying the response body,
    /// which is where YouTube puts the quota/key error details.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query_params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query_params)
            .query(&[("key", &*self.api_key)])
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(UpstreamError::Status {
                endpoint,
                status,
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { endpoint, source })
    }
}

impl Upstream for YouTubeClient {
    /// Uses `search.list` with `type=video&eventType=live`.
    ///
    /// # API Cost
    ///
    /// This operation costs 100 quota units per call.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    async fn search_live_videos(
        &self,
        region_code: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, UpstreamError> {
        let max_results = max_results.to_string();
        let query_params = [
            ("part", "snippet"),
            ("eventType", "live"),
            ("type", "video"),
            ("regionCode", region_code),
            ("maxResults", max_results.as_str()),
            ("q", query),
        ];

        let response: SearchListResponse = self.get("search", &query_params).await?;

        tracing::debug!(
            total_results = response.page_info.total_results,
            returned_items = response.items.len(),
            "fetched live search results"
        );

        Ok(response.items)
    }

    /// Uses `videos.list` with `part=snippet,liveStreamingDetails`.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self))]
    async fn get_video_details(&self, video_id: &str) -> Result<Option<Video>, UpstreamError> {
        let query_params = [("part", "snippet,liveStreamingDetails"), ("id", video_id)];

        let response: VideoListResponse = self.get("videos", &query_params).await?;

        tracing::debug!(
            video_id,
            returned_items = response.items.len(),
            "fetched video details"
        );

        Ok(response.items.into_iter().next())
    }

    /// Uses `channels.list` with a comma-separated `id` list.
    ///
    /// IDs are sent in batches of 50, the most the endpoint accepts in one call.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self))]
    async fn get_channel_snippets(
        &self,
        channel_ids: &[String],
    ) -> Result<HashMap<String, ChannelSnippet>, UpstreamError> {
        let mut snippets = HashMap::with_capacity(channel_ids.len());
        for batch in channel_ids.chunks(MAX_CHANNEL_IDS_PER_REQUEST) {
            let ids = batch.join(",");
            let max_results = batch.len().to_string();
            let query_params = [
                ("part", "snippet"),
                ("id", ids.as_str()),
                ("maxResults", max_results.as_str()),
            ];

            let response: ChannelListResponse = self.get("channels", &query_params).await?;

            tracing::debug!(
                requested = batch.len(),
                returned_items = response.items.len(),
                "fetched channel snippets"
            );

            snippets.extend(response.items.into_iter().map(|c| (c.id, c.snippet)));
        }
        Ok(snippets)
    }
}
