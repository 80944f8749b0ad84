//! In-memory [`Upstream`] for unit tests.

use crate::error::UpstreamError;
use crate::youtube_api::{ChannelSnippet, SearchResult, Upstream, Video};
use http::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

/// A call made against [`MockUpstream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Search {
        region_code: String,
        query: String,
        max_results: u32,
    },
    Video(String),
    Channels(Vec<String>),
}

#[derive(Debug, Default)]
pub(crate) struct MockUpstream {
    pub(crate) search_results: Vec<SearchResult>,
    pub(crate) videos: HashMap<String, Video>,
    pub(crate) channels: HashMap<String, ChannelSnippet>,
    /// Makes every `channels.list` call fail with a 403.
    pub(crate) fail_channels: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl MockUpstream {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Search { .. }))
            .count()
    }

    pub(crate) fn channel_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Channels(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Upstream for MockUpstream {
    async fn search_live_videos(
        &self,
        region_code: &str,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, UpstreamError> {
        self.record(Call::Search {
            region_code: region_code.to_string(),
            query: query.to_string(),
            max_results,
        });
        Ok(self
            .search_results
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn get_video_details(&self, video_id: &str) -> Result<Option<Video>, UpstreamError> {
        self.record(Call::Video(video_id.to_string()));
        Ok(self.videos.get(video_id).cloned())
    }

    async fn get_channel_snippets(
        &self,
        channel_ids: &[String],
    ) -> Result<HashMap<String, ChannelSnippet>, UpstreamError> {
        self.record(Call::Channels(channel_ids.to_vec()));
        if self.fail_channels {
            return Err(UpstreamError::Status {
                endpoint: "channels",
                status: StatusCode::FORBIDDEN,
                body: "quotaExceeded".to_string(),
            });
        }
        Ok(channel_ids
            .iter()
            .filter_map(|id| Some((id.clone(), self.channels.get(id)?.clone())))
            .collect())
    }
}

/// A live search hit as `search.list` returns it.
pub(crate) fn search_result(video_id: &str, channel_id: &str) -> SearchResult {
    serde_json::from_value(serde_json::json!({
        "kind": "youtube#searchResult",
        "etag": "etag",
        "id": { "kind": "youtube#video", "videoId": video_id },
        "snippet": {
            "publishedAt": "2025-03-01T09:00:00Z",
            "channelId": channel_id,
            "title": format!("Stream {video_id}"),
            "description": "",
            "thumbnails": {
                "default": { "url": format!("https://i.ytimg.com/vi/{video_id}/default_live.jpg"), "width": 120, "height": 90 },
                "medium": { "url": format!("https://i.ytimg.com/vi/{video_id}/mqdefault_live.jpg"), "width": 320, "height": 180 },
                "high": { "url": format!("https://i.ytimg.com/vi/{video_id}/hqdefault_live.jpg"), "width": 480, "height": 360 }
            },
            "channelTitle": format!("Channel {channel_id}"),
            "liveBroadcastContent": "live",
            "publishTime": "2025-03-01T09:00:00Z"
        }
    }))
    .expect("search result fixture deserializes")
}

/// A `videos.list` item; `live` controls whether it has an active chat.
pub(crate) fn video(video_id: &str, channel_id: &str, live: bool) -> Video {
    let mut details = serde_json::json!({
        "actualStartTime": "2025-03-01T09:01:02Z",
        "concurrentViewers": "42"
    });
    let broadcast_content = if live { "live" } else { "none" };
    if live {
        details["activeLiveChatId"] = serde_json::json!("Cg0KC2xpdmVjaGF0");
    }
    serde_json::from_value(serde_json::json!({
        "kind": "youtube#video",
        "id": video_id,
        "snippet": {
            "publishedAt": "2025-03-01T08:55:00Z",
            "channelId": channel_id,
            "title": format!("Video {video_id}"),
            "channelTitle": format!("Channel {channel_id}"),
            "thumbnails": {
                "medium": { "url": format!("https://i.ytimg.com/vi/{video_id}/mqdefault.jpg") }
            },
            "liveBroadcastContent": broadcast_content
        },
        "liveStreamingDetails": details
    }))
    .expect("video fixture deserializes")
}

/// A channel snippet whose avatar URL is derived from `channel_id`.
pub(crate) fn channel(channel_id: &str) -> ChannelSnippet {
    serde_json::from_value(serde_json::json!({
        "title": format!("Channel {channel_id}"),
        "publishedAt": "2015-06-01T00:00:00Z",
        "thumbnails": {
            "default": { "url": icon_url(channel_id), "width": 88, "height": 88 },
            "medium": { "url": format!("https://yt3.ggpht.com/{channel_id}=s240"), "width": 240, "height": 240 }
        }
    }))
    .expect("channel fixture deserializes")
}

pub(crate) fn icon_url(channel_id: &str) -> String {
    format!("https://yt3.ggpht.com/{channel_id}=s88")
}
