//! YouTube Search API types.

use crate::youtube_api::types::{PageInfo, Thumbnails};
use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Response structure for the `search.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// A list of results that match the search criteria.
    #[serde(default)]
    pub items: Vec<SearchResult>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A search result contains information about a YouTube video, channel, or playlist that matches
/// the search parameters.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: SearchResultSnippet,
}

/// Identifies the resource that matched the search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultId {
    /// The type of the API resource, e.g. `youtube#video`.
    #[serde(default)]
    pub kind: String,
    /// Only present when `kind` is `youtube#video`.
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Basic details about a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultSnippet {
    /// The creation date and time of the resource, in ISO 8601 format.
    ///
    /// `None` if absent or not a valid timestamp, so that one odd hit does not fail the page.
    #[serde(rename = "publishedAt", default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<Timestamp>,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    /// One of `upcoming`, `live`, or `none`.
    #[serde(rename = "liveBroadcastContent")]
    pub live_broadcast_content: Option<String>,
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Timestamp>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}
