//! Channel avatar lookup, cached as one map for all channels.

use crate::app::App;
use crate::cache::{self, CacheStore, cache_key};
use crate::youtube_api::Upstream;
use eyre::Context;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::instrument;

/// Channel ID to avatar URL.
pub type ChannelIconMap = BTreeMap<String, String>;

pub const CHANNEL_ICONS_ENTRY: &str = "youtube-channel-icons";

/// Avatars rarely change; keep the map for 12 hours.
pub const CHANNEL_ICONS_TTL: Duration = Duration::from_secs(12 * 60 * 60);

impl<U: Upstream, C: CacheStore> App<U, C> {
    /// Returns avatar URLs for (at least) the given channels.
    ///
    /// Channels already in the cached map are served from it. All others are fetched with a
    /// single batched `channels.list` call, merged into the map, and the map is written back,
    /// even if some of them could not be resolved. Channels YouTube did not return are simply
    /// absent from the result, and callers should treat that as "no icon".
    ///
    /// Duplicate IDs in `channel_ids` are fine.
    #[instrument(skip(self, channel_ids), fields(requested = channel_ids.len()))]
    pub async fn resolve_channel_icons(
        &self,
        channel_ids: &[String],
    ) -> eyre::Result<ChannelIconMap> {
        let key = cache_key(CHANNEL_ICONS_ENTRY);
        let mut icons: ChannelIconMap = cache::get_json(&self.cache, &key)
            .await
            .context("read cached channel icons")?
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let missing: Vec<String> = channel_ids
            .iter()
            .filter(|id| !icons.contains_key(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            tracing::trace!(cached = icons.len(), "all channel icons cached");
            return Ok(icons);
        }

        let snippets = self
            .upstream
            .get_channel_snippets(&missing)
            .await
            .context("fetch channel snippets")?;

        let mut resolved = 0;
        for id in &missing {
            if let Some(url) = snippets.get(id).and_then(|s| s.thumbnails.icon_url()) {
                icons.insert(id.clone(), url.to_string());
                resolved += 1;
            }
        }

        tracing::debug!(
            missing = missing.len(),
            resolved,
            cached = icons.len(),
            "fetched missing channel icons"
        );

        cache::put_json(&self.cache, &key, &icons, CHANNEL_ICONS_TTL)
            .await
            .context("store channel icons")?;

        Ok(icons)
    }
}
