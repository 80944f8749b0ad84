use crate::cache::CacheStore;
use crate::config::LiveListSettings;
use crate::youtube_api::Upstream;
use tokio::sync::Mutex;

/// Everything a request handler needs: the YouTube client, the cache, and live-list settings.
///
/// The operations themselves live next to their data types in [`crate::icons`],
/// [`crate::lives`] and [`crate::video`].
#[derive(Debug)]
pub struct App<U, C> {
    pub(crate) upstream: U,
    pub(crate) cache: C,
    pub(crate) live_list: LiveListSettings,
    /// Held while the live list is being refreshed, if single-flight is enabled.
    pub(crate) refresh_lock: Option<Mutex<()>>,
}

impl<U: Upstream, C: CacheStore> App<U, C> {
    pub fn new(upstream: U, cache: C, live_list: LiveListSettings) -> Self {
        let refresh_lock = live_list.single_flight.then(|| Mutex::new(()));
        Self {
            upstream,
            cache,
            live_list,
            refresh_lock,
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}
