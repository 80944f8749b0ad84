//! YouTube Videos API types.

use crate::youtube_api::types::{PageInfo, Thumbnails};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Response structure for the `videos.list` API call.
///
/// Contains a list of [`Video`] resources that match the request criteria,
/// along with pagination information in [`PageInfo`].
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// A list of videos that match the request criteria.
    ///
    /// Empty when the requested ID does not exist.
    #[serde(default)]
    pub items: VecDeque<Video>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

/// A `video` resource represents a YouTube video.
///
/// Only the `snippet` and `liveStreamingDetails` parts are requested.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
    pub snippet: VideoSnippet,
    /// Only present if the video is an upcoming, live, or completed live broadcast.
    #[serde(rename = "liveStreamingDetails")]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

impl Video {
    /// Whether the broadcast is on air right now.
    ///
    /// YouTube only hands out an active live chat ID while a broadcast is live.
    pub fn is_live(&self) -> bool {
        self.live_streaming_details
            .as_ref()
            .and_then(|d| d.active_live_chat_id.as_deref())
            .is_some_and(|id| !id.is_empty())
    }

    /// When the broadcast actually started, if it has.
    pub fn actual_start_time(&self) -> Option<Timestamp> {
        self.live_streaming_details
            .as_ref()
            .and_then(|d| d.actual_start_time)
    }
}

/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(rename = "liveBroadcastContent")]
    pub live_broadcast_content: Option<String>,
}

/// Metadata about a live video broadcast.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#liveStreamingDetails>
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveStreamingDetails {
    #[serde(rename = "actualStartTime")]
    pub actual_start_time: Option<Timestamp>,
    #[serde(rename = "actualEndTime")]
    pub actual_end_time: Option<Timestamp>,
    #[serde(rename = "scheduledStartTime")]
    pub scheduled_start_time: Option<Timestamp>,
    /// The number of viewers currently watching the broadcast.
    ///
    /// The API returns this as a string.
    #[serde(rename = "concurrentViewers")]
    pub concurrent_viewers: Option<String>,
    /// The ID of the currently active live chat attached to this video.
    ///
    /// Absent once the broadcast has ended.
    #[serde(rename = "activeLiveChatId")]
    pub active_live_chat_id: Option<String>,
}
