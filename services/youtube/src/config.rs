//! Runtime configuration, read from command-line flags with environment fallbacks.

use crate::youtube_api::DEFAULT_API_BASE;
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;

/// Search terms used to find live broadcasts when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "ゲーム",
    "Game",
    "VTuber",
    "にじさんじ",
    "Nijisanji",
    "ホロライブ",
    "Hololive",
    "雑談",
    "ライブ",
    "Live",
    "配信",
    "Streaming",
    "ニュース",
    "News",
    "天気",
];

/// Edge service that lists YouTube live broadcasts and looks up video details.
#[derive(Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// YouTube Data API key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Address to serve HTTP on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8787")]
    pub listen: SocketAddr,

    /// Base URL of the YouTube Data API.
    #[arg(long, env = "YOUTUBE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Region the live search is restricted to.
    #[arg(long, env = "LIVE_REGION_CODE", default_value = "JP")]
    pub region_code: String,

    /// Search keyword; repeat the flag (or comma-separate the variable) for several.
    #[arg(long = "keyword", env = "LIVE_KEYWORDS", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Let concurrent cache misses wait for a single refresh instead of each calling YouTube.
    #[arg(long, env = "LIVE_SINGLE_FLIGHT")]
    pub single_flight: bool,
}

// The API key is left out so the config can be logged.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("api_base", &self.api_base)
            .field("region_code", &self.region_code)
            .field("keywords", &self.keywords)
            .field("single_flight", &self.single_flight)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn live_list(&self) -> LiveListSettings {
        let keywords = if self.keywords.is_empty() {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            self.keywords.clone()
        };
        LiveListSettings {
            region_code: self.region_code.clone(),
            keywords,
            single_flight: self.single_flight,
        }
    }
}

/// The part of the configuration that shapes the live list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveListSettings {
    pub region_code: String,
    pub keywords: Vec<String>,
    pub single_flight: bool,
}

impl Default for LiveListSettings {
    fn default() -> Self {
        Self {
            region_code: "JP".to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            single_flight: false,
        }
    }
}

impl LiveListSettings {
    /// The `q` parameter for the live search: keywords joined with the `OR` operator.
    pub fn search_query(&self) -> String {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}
