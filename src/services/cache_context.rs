//! Fail-open access to the catalog cache.
//!
//! Every cache failure is logged and then treated as a miss (reads) or a
//! no-op (writes), so callers always fall through to the store. An
//! `Unavailable` error triggers up to `reconnect_attempts` reconnects before
//! the call gives up.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::models::{CacheConfig, CacheKey};
use crate::domain::ports::{CacheError, CacheResult, CatalogCache};

/// Idle in-flight locks are dropped after this long.
const KEY_LOCK_IDLE_SECS: u64 = 60;

pub struct CacheContext<C: CatalogCache> {
    cache: Arc<C>,
    ttl: Duration,
    reconnect_attempts: u32,
    key_locks: moka::future::Cache<String, Arc<Mutex<()>>>,
}

impl<C: CatalogCache> CacheContext<C> {
    pub fn new(cache: Arc<C>, config: &CacheConfig) -> Self {
        let key_locks = moka::future::Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_idle(Duration::from_secs(KEY_LOCK_IDLE_SECS))
            .build();

        Self {
            cache,
            ttl: Duration::from_secs(config.ttl_secs),
            reconnect_attempts: config.reconnect_attempts,
            key_locks,
        }
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Run `op`, reconnecting on `Unavailable`. Any remaining error is logged
    /// and swallowed.
    async fn call<T, F, Fut>(&self, op: &'static str, key: &str, f: F) -> Option<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CacheResult<T>>,
    {
        let mut attempts = 0;
        loop {
            match f().await {
                Ok(value) => return Some(value),
                Err(CacheError::Unavailable) if attempts < self.reconnect_attempts => {
                    attempts += 1;
                    tracing::debug!(op, key, attempt = attempts, "cache unavailable, reconnecting");
                    if let Err(e) = self.cache.connect().await {
                        tracing::warn!(op, key, error = %e, "cache reconnect failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(op, key, error = %e, "cache operation failed, falling through");
                    return None;
                }
            }
        }
    }

    /// Fetch and decode a document. Undecodable entries count as misses.
    pub async fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        let doc = self.call("get_doc", &key, || self.cache.get_doc(&key)).await??;

        match serde_json::from_str(&doc) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn write<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let key = key.to_string();
        let doc = match serde_json::to_string(value) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not encode cache entry");
                return;
            }
        };

        self.call("set_doc", &key, || self.cache.set_doc(&key, doc.clone(), Some(self.ttl)))
            .await;
    }

    /// Fetch and decode a list. One undecodable element discards the whole list.
    pub async fn read_list<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<Vec<T>> {
        let key = key.to_string();
        let docs = self.call("get_list", &key, || self.cache.get_list(&key)).await??;

        match docs.iter().map(|doc| serde_json::from_str(doc)).collect() {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding undecodable cache list");
                None
            }
        }
    }

    /// Store a fully built list in a single step.
    pub async fn write_list<T: Serialize>(&self, key: &CacheKey, values: &[T]) {
        let key = key.to_string();
        let docs: Result<Vec<String>, _> = values.iter().map(serde_json::to_string).collect();
        let docs = match docs {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not encode cache list");
                return;
            }
        };

        self.call("set_list", &key, || self.cache.set_list(&key, docs.clone(), Some(self.ttl)))
            .await;
    }

    pub async fn invalidate(&self, keys: &[CacheKey]) {
        if keys.is_empty() {
            return;
        }
        // Index keys only ever expire.
        debug_assert!(
            keys.iter().all(|key| !key.is_secondary_index()),
            "secondary index keys are not invalidated"
        );
        let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let joined = keys.join(",");

        if let Some(removed) = self.call("delete_keys", &joined, || self.cache.delete_keys(&keys)).await {
            tracing::debug!(keys = %joined, removed, "invalidated cache keys");
        }
    }

    pub async fn flush(&self) {
        if self.call("flush_all", "*", || self.cache.flush_all()).await.is_some() {
            tracing::debug!("flushed cache");
        }
    }

    /// Serialize population of one key. Hold the guard across the store read
    /// and the cache write; re-check the cache after acquiring it.
    pub async fn lock(&self, key: &CacheKey) -> OwnedMutexGuard<()> {
        let lock = self
            .key_locks
            .get_with(key.to_string(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaCatalogCache;
    use uuid::Uuid;

    fn context(reconnect_attempts: u32) -> CacheContext<MokaCatalogCache> {
        let config = CacheConfig { reconnect_attempts, ..CacheConfig::default() };
        CacheContext::new(Arc::new(MokaCatalogCache::from_config(&config)), &config)
    }

    #[tokio::test]
    async fn test_round_trip_typed_values() {
        let ctx = context(1);
        let key = CacheKey::Artist(Uuid::new_v4());

        ctx.write(&key, &vec![1, 2, 3]).await;
        assert_eq!(ctx.read::<Vec<i32>>(&key).await, Some(vec![1, 2, 3]));

        ctx.invalidate(&[key.clone()]).await;
        assert_eq!(ctx.read::<Vec<i32>>(&key).await, None);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let ctx = context(1);
        let key = CacheKey::Albums;
        ctx.cache().set_doc(&key.to_string(), "not json".to_string(), None).await.unwrap();

        assert_eq!(ctx.read::<Vec<String>>(&key).await, None);
    }

    #[tokio::test]
    async fn test_reconnects_when_unavailable() {
        let ctx = context(1);
        let key = CacheKey::Artists;
        ctx.write(&key, &"cached").await;
        ctx.cache().disconnect().await.unwrap();

        assert_eq!(ctx.read::<String>(&key).await, Some("cached".to_string()));
        assert!(ctx.cache().is_connected());
    }

    #[tokio::test]
    async fn test_fails_open_without_reconnect() {
        let ctx = context(0);
        let key = CacheKey::Artists;
        ctx.write(&key, &"cached").await;
        ctx.cache().disconnect().await.unwrap();

        assert_eq!(ctx.read::<String>(&key).await, None);
        ctx.write(&key, &"ignored").await;
        ctx.flush().await;
        assert!(!ctx.cache().is_connected());
    }

    #[tokio::test]
    async fn test_lists_are_written_whole() {
        let ctx = context(1);
        let key = CacheKey::FoundedYearRange { min: 1900, max: 1950 };
        ctx.write_list(&key, &["a", "b"]).await;

        assert_eq!(ctx.read_list::<String>(&key).await, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(ctx.cache().get_list(&key.to_string()).await.unwrap().unwrap().len(), 2);
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "secondary index keys are not invalidated")]
    async fn test_index_keys_are_never_invalidated() {
        let ctx = context(1);
        ctx.invalidate(&[CacheKey::Genre(crate::domain::models::MusicGenre::Rock)]).await;
    }
}
