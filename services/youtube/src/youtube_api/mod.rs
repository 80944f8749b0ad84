//! YouTube Data API v3 client library.
//!
//! Only the read-only, API-key authenticated endpoints this service needs are covered:
//!
//! - `search.list` to find broadcasts that are live right now
//! - `videos.list` for a single video's snippet and live-streaming details
//! - `channels.list` for channel avatars
//!
//! Callers depend on the [`Upstream`] trait rather than on [`YouTubeClient`] directly so that
//! the caching layers above can be exercised without network access.

pub mod channels;
pub mod client;
pub mod search;
pub mod types;
pub mod videos;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{DEFAULT_API_BASE, Upstream, YouTubeClient};
pub use types::{PageInfo, Thumbnail, Thumbnails};

pub use channels::{Channel, ChannelSnippet};
pub use search::{SearchResult, SearchResultId, SearchResultSnippet};
pub use videos::{LiveStreamingDetails, Video, VideoSnippet};
