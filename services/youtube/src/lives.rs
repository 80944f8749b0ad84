//! The paginated list of live broadcasts.
//!
//! One search result set is shared by every page: on a cache miss the live search is run once,
//! trimmed to [`MAX_ITEMS`], enriched with channel avatars, cached for [`LIVE_LIST_TTL`], and
//! then sliced into pages of [`PER_PAGE`].

use crate::app::App;
use crate::cache::{self, CacheStore, cache_key};
use crate::youtube_api::{SearchResult, Upstream};
use eyre::Context;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;
use tracing::instrument;

pub const PER_PAGE: usize = 8;

/// How many live broadcasts are kept in the cached list.
pub const MAX_ITEMS: usize = 24;

/// How many results to ask the search endpoint for (its maximum).
pub const SEARCH_MAX_RESULTS: u32 = 50;

pub const LIVE_LIST_ENTRY: &str = "youtube-live-list";

pub const LIVE_LIST_TTL: Duration = Duration::from_secs(30 * 60);

/// A broadcast in the live list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveVideo {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub channel_id: String,
    pub channel_name: String,
    pub channel_icon: Option<String>,
    pub thumbnail_url: String,
    pub start_time: Timestamp,
}

impl LiveVideo {
    /// Builds a list entry from a search hit, without an icon.
    ///
    /// Returns `None` for hits that are not videos or carry no usable publish time.
    pub fn from_search_result(result: SearchResult) -> Option<Self> {
        let video_id = result.id.video_id?;
        let snippet = result.snippet;
        let start_time = snippet.published_at?;
        Some(Self {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            thumbnail_url: snippet.thumbnails.medium_url().unwrap_or_default().to_string(),
            video_id,
            title: snippet.title,
            channel_id: snippet.channel_id,
            channel_name: snippet.channel_title,
            channel_icon: None,
            start_time,
        })
    }
}

/// One page of the live list, as returned by `GET /lives`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePage {
    pub page: i64,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub items: Vec<LiveVideo>,
}

impl LivePage {
    pub fn paginate(all: &[LiveVideo], page: i64) -> Self {
        Self {
            page,
            per_page: PER_PAGE,
            total: all.len(),
            total_pages: all.len().div_ceil(PER_PAGE),
            items: all[page_window(all.len(), page)].to_vec(),
        }
    }
}

/// Index range of `page` (1-based) in a list of `len` items.
///
/// Pages are not validated. The bounds follow array-slice semantics: a negative bound counts
/// back from the end, both are clamped to `0..=len`, and the range is empty if the end is not
/// past the start. So page 0 is empty and page -1 is the second-to-last full window.
fn page_window(len: usize, page: i64) -> Range<usize> {
    let per_page = PER_PAGE as i64;
    let start = page.saturating_sub(1).saturating_mul(per_page);
    let end = start.saturating_add(per_page);

    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |i: i64| -> usize {
        let i = if i < 0 { len_i.saturating_add(i).max(0) } else { i.min(len_i) };
        // 0 <= i <= len here
        i as usize
    };

    let (start, end) = (clamp(start), clamp(end));
    start..end.max(start)
}

impl<U: Upstream, C: CacheStore> App<U, C> {
    /// Returns the requested page of the live list.
    #[instrument(skip(self))]
    pub async fn live_page(&self, page: i64) -> eyre::Result<LivePage> {
        let all = self.live_videos().await?;
        Ok(LivePage::paginate(&all, page))
    }

    /// Returns the full live list, from cache if it is fresh.
    ///
    /// Without single-flight, concurrent misses each refresh and the last write wins.
    pub async fn live_videos(&self) -> eyre::Result<Vec<LiveVideo>> {
        let key = cache_key(LIVE_LIST_ENTRY);
        if let Some(videos) = self.cached_live_videos(&key).await? {
            return Ok(videos);
        }

        let _refreshing = match &self.refresh_lock {
            Some(lock) => {
                let guard = lock.lock().await;
                // someone else may have refreshed while we were waiting
                if let Some(videos) = self.cached_live_videos(&key).await? {
                    return Ok(videos);
                }
                Some(guard)
            }
            None => None,
        };

        let videos = self.fetch_live_videos().await?;
        cache::put_json(&self.cache, &key, &videos, LIVE_LIST_TTL)
            .await
            .context("store live list")?;
        Ok(videos)
    }

    async fn cached_live_videos(&self, key: &str) -> eyre::Result<Option<Vec<LiveVideo>>> {
        let videos: Option<Vec<LiveVideo>> = cache::get_json(&self.cache, key)
            .await
            .context("read cached live list")?;
        if let Some(videos) = &videos {
            tracing::trace!(total = videos.len(), "live list served from cache");
        }
        Ok(videos)
    }

    /// Runs the live search and attaches channel icons.
    #[instrument(skip(self))]
    async fn fetch_live_videos(&self) -> eyre::Result<Vec<LiveVideo>> {
        let query = self.live_list.search_query();
        let results = self
            .upstream
            .search_live_videos(&self.live_list.region_code, &query, SEARCH_MAX_RESULTS)
            .await
            .context("search live videos")?;
        let found = results.len();

        let mut videos: Vec<LiveVideo> = results
            .into_iter()
            .filter_map(LiveVideo::from_search_result)
            .take(MAX_ITEMS)
            .collect();

        let channel_ids: Vec<String> = videos
            .iter()
            .filter(|v| !v.channel_id.is_empty())
            .map(|v| v.channel_id.clone())
            .collect();
        let icons = self
            .resolve_channel_icons(&channel_ids)
            .await
            .context("resolve channel icons for live list")?;
        for video in &mut videos {
            video.channel_icon = icons.get(&video.channel_id).cloned();
        }

        tracing::debug!(found, kept = videos.len(), "refreshed live list");
        Ok(videos)
    }
}
