use crate::app::App;
use crate::cache::CacheStore;
use crate::error::HandlerError;
use crate::youtube_api::Upstream;
use eyre::Context;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Details of a single video, as returned by `GET /video`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub channel_icon: Option<String>,
    pub thumbnail_url: String,
    /// Whether the video is a broadcast that is on air right now.
    pub is_live: bool,
    /// When the broadcast actually started, if it is or was a live broadcast.
    pub start_time: Option<Timestamp>,
}

impl<U: Upstream, C: CacheStore> App<U, C> {
    /// Looks up one video. Never cached, only its channel icon is.
    ///
    /// If the icon lookup fails the video is still returned, without an icon.
    #[instrument(skip(self))]
    pub async fn video_info(&self, video_id: Option<&str>) -> Result<VideoInfo, HandlerError> {
        let video_id = video_id
            .filter(|id| !id.is_empty())
            .ok_or(HandlerError::BadRequest("videoId required"))?;

        let video = self
            .upstream
            .get_video_details(video_id)
            .await
            .context("fetch video details")?
            .ok_or(HandlerError::NotFound)?;

        let is_live = video.is_live();
        let start_time = video.actual_start_time();
        let snippet = video.snippet;

        let channel_icon = if snippet.channel_id.is_empty() {
            None
        } else {
            match self
                .resolve_channel_icons(std::slice::from_ref(&snippet.channel_id))
                .await
            {
                Ok(mut icons) => icons.remove(&snippet.channel_id),
                Err(e) => {
                    tracing::warn!(
                        channel_id = %snippet.channel_id,
                        error = %format!("{e:#}"),
                        "channel icon lookup failed, returning video without icon"
                    );
                    None
                }
            }
        };

        Ok(VideoInfo {
            video_id: video_id.to_string(),
            title: snippet.title,
            channel_name: snippet.channel_title,
            channel_icon,
            thumbnail_url: snippet.thumbnails.medium_url().unwrap_or_default().to_string(),
            is_live,
            start_time,
        })
    }
}
