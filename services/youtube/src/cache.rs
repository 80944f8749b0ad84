//! Time-bounded response cache.
//!
//! Entries are stored as HTTP responses whose `Cache-Control: max-age` directive decides how
//! long they stay fresh, the same contract an edge cache offers. Keys are synthetic URLs that
//! carry [`CACHE_SCHEMA_VERSION`], so changing the shape of a cached payload only requires
//! bumping the version instead of serving old-shaped entries to new code.

use bytes::Bytes;
use eyre::Context;
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderMap, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Bump when a cached payload type changes shape.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Builds the versioned cache key for a named entry.
pub fn cache_key(name: &str) -> String {
    format!("https://cache/{name}/v{CACHE_SCHEMA_VERSION}")
}

/// A shared key-value store of cached responses.
pub trait CacheStore: Send + Sync + 'static {
    /// Returns the body of a fresh entry, or `None` on miss or expiry.
    fn get(&self, key: &str) -> impl Future<Output = eyre::Result<Option<Bytes>>> + Send;

    /// Stores a response, honouring its `Cache-Control: max-age`.
    ///
    /// Responses without a positive `max-age` are not stored.
    fn put(
        &self,
        key: &str,
        response: Response<Bytes>,
    ) -> impl Future<Output = eyre::Result<()>> + Send;
}

/// Extracts the `max-age` directive from `Cache-Control` headers.
pub fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .find_map(|directive| {
            let (name, value) = directive.trim().split_once('=')?;
            if !name.trim().eq_ignore_ascii_case("max-age") {
                return None;
            }
            value.trim().trim_matches('"').parse::<u64>().ok()
        })
        .map(Duration::from_secs)
}

/// Serializes `value` into a JSON response that stays fresh for `ttl`.
pub fn json_entry<T: Serialize + ?Sized>(value: &T, ttl: Duration) -> eyre::Result<Response<Bytes>> {
    let body = serde_json::to_vec(value).context("serialize cache entry")?;
    Response::builder()
        .header(CONTENT_TYPE, "application/json")
        .header(CACHE_CONTROL, format!("max-age={}", ttl.as_secs()))
        .body(Bytes::from(body))
        .context("build cache entry")
}

/// Reads and decodes a JSON entry.
///
/// A payload that no longer decodes is logged and treated as a miss so that it gets
/// overwritten by the next refresh.
pub async fn get_json<C, T>(cache: &C, key: &str) -> eyre::Result<Option<T>>
where
    C: CacheStore,
    T: DeserializeOwned,
{
    let Some(body) = cache.get(key).await.context("read cache entry")? else {
        return Ok(None);
    };
    match serde_json::from_slice(&body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding undecodable cache entry");
            Ok(None)
        }
    }
}

/// Serializes `value` and stores it under `key` for `ttl`.
pub async fn put_json<C, T>(cache: &C, key: &str, value: &T, ttl: Duration) -> eyre::Result<()>
where
    C: CacheStore,
    T: Serialize + ?Sized,
{
    let entry = json_entry(value, ttl)?;
    cache.put(key, entry).await.context("write cache entry")
}

#[derive(Debug)]
struct Entry {
    body: Bytes,
    expires_at: Instant,
}

/// In-process [`CacheStore`].
///
/// Cloning shares the underlying map, so every connection task sees the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> eyre::Result<Option<Bytes>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.body.clone())),
            Some(_) => {
                tracing::trace!(key, "cache entry expired");
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, response: Response<Bytes>) -> eyre::Result<()> {
        let ttl = match max_age(response.headers()) {
            Some(ttl) if !ttl.is_zero() => ttl,
            _ => {
                tracing::debug!(key, "response has no max-age, not caching");
                return Ok(());
            }
        };

        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                body: response.into_body(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
