//! Edge service that lists YouTube live broadcasts and looks up single videos.
//!
//! Search results and channel avatars are cached so that the YouTube API quota is spent at
//! most once per cache window, however many clients page through the list.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod icons;
pub mod lives;
pub mod server;
pub mod video;
pub mod youtube_api;

pub use app::App;
pub use cache::{CacheStore, MemoryCache};
pub use config::{Config, LiveListSettings};
pub use error::{HandlerError, UpstreamError};
pub use icons::ChannelIconMap;
pub use lives::{LivePage, LiveVideo};
pub use video::VideoInfo;
pub use youtube_api::{Upstream, YouTubeClient};
