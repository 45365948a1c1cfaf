//! On-disk response cache for provider requests
//!
//! Provides a `CacheStore` that keeps one JSON file per provider, mapping cache
//! keys to the raw response bodies returned by that provider.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

use super::key::{fingerprint, RequestParams};

/// Contents of one provider's cache file, keyed by request fingerprint
pub type CacheEntries = BTreeMap<String, Value>;

/// Reads and writes provider response caches
///
/// Each store id maps to `<store_id>_cache.json` inside the cache directory
/// (by default `~/.cache/restaurant-ratings/` on Linux). Entries never expire and are
/// never evicted; a re-fetch simply overwrites its key.
///
/// There is no locking. Two processes saving the same store concurrently will
/// race and the last save wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore writing to `cache_dir`
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the cache file for the given store
    pub fn cache_path(&self, store_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}_cache.json", store_id))
    }

    /// Loads every cached entry for a store
    ///
    /// A missing, unreadable or corrupt file yields an empty mapping. This is not
    /// reported to the caller; the next miss rewrites the file from scratch.
    pub fn load(&self, store_id: &str) -> CacheEntries {
        let path = self.cache_path(store_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cache file unavailable, starting empty");
                return CacheEntries::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cache file unreadable, starting empty");
                CacheEntries::new()
            }
        }
    }

    /// Replaces the stored contents of a store with `entries`
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn save(&self, store_id: &str, entries: &CacheEntries) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let json = serde_json::to_string(entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(store_id), json)
    }

    /// Returns the cached response for a request, fetching it on a miss
    ///
    /// # Arguments
    /// * `store_id` - Which provider cache to consult (e.g., "google")
    /// * `endpoint` - The provider URL, part of the cache key
    /// * `params` - The request parameters, part of the cache key
    /// * `credential` - The API key, part of the cache key
    /// * `fetch` - Performs the request; only called on a miss
    ///
    /// # Behavior
    /// - Hit: returns the stored body without calling `fetch` or saving
    /// - Miss: calls `fetch` once, stores the body under the key and saves the store once
    /// - A failed `fetch` is returned as-is and nothing is written
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        store_id: &str,
        endpoint: &str,
        params: &RequestParams,
        credential: &str,
        fetch: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: From<std::io::Error>,
    {
        let mut entries = self.load(store_id);
        let key = fingerprint(endpoint, params, credential);

        if let Some(cached) = entries.remove(&key) {
            info!(store = store_id, "Using cached response");
            return Ok(cached);
        }

        info!(store = store_id, endpoint, "Cache miss, fetching from provider");
        let fresh = fetch().await?;

        entries.insert(key, fresh.clone());
        self.save(store_id, &entries)?;

        Ok(fresh)
    }
}
