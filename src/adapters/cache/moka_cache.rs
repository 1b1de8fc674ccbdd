//! In-process CatalogCache backed by moka.
//!
//! Each entry carries its own absolute deadline, so documents and lists can
//! have different lifetimes and `expire` can move a deadline after the fact.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::domain::models::CacheConfig;
use crate::domain::ports::{CacheError, CacheResult, CatalogCache};

#[derive(Debug)]
enum CacheValue {
    Document(String),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<CacheValue>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: CacheValue, ttl: Option<Duration>) -> Self {
        Self {
            value: Arc::new(value),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }
}

struct EntryDeadline;

impl EntryDeadline {
    fn remaining(entry: &CacheEntry, now: Instant) -> Option<Duration> {
        entry.expires_at.map(|at| at.saturating_duration_since(now))
    }
}

impl Expiry<String, CacheEntry> for EntryDeadline {
    fn expire_after_create(&self, _key: &String, value: &CacheEntry, created_at: Instant) -> Option<Duration> {
        Self::remaining(value, created_at)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::remaining(value, updated_at)
    }
}

pub struct MokaCatalogCache {
    entries: Cache<String, CacheEntry>,
    connected: AtomicBool,
    // Serializes read-modify-write operations on a single entry.
    write_lock: Mutex<()>,
}

impl MokaCatalogCache {
    /// A connected cache bounded to `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryDeadline)
            .build();

        Self {
            entries,
            connected: AtomicBool::new(true),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity)
    }

    fn ensure_connected(&self) -> CacheResult<()> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(CacheError::Unavailable)
        }
    }
}

#[async_trait]
impl CatalogCache for MokaCatalogCache {
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.ensure_connected()?;
        Ok(self.entries.get(key).await.is_some())
    }

    async fn get_doc(&self, key: &str) -> CacheResult<Option<String>> {
        self.ensure_connected()?;
        match self.entries.get(key).await {
            None => Ok(None),
            Some(entry) => match entry.value.as_ref() {
                CacheValue::Document(doc) => Ok(Some(doc.clone())),
                CacheValue::List(_) => Err(CacheError::WrongType(key.to_string())),
            },
        }
    }

    async fn set_doc(&self, key: &str, doc: String, ttl: Option<Duration>) -> CacheResult<()> {
        self.ensure_connected()?;
        self.entries
            .insert(key.to_string(), CacheEntry::new(CacheValue::Document(doc), ttl))
            .await;
        Ok(())
    }

    async fn get_list(&self, key: &str) -> CacheResult<Option<Vec<String>>> {
        self.ensure_connected()?;
        match self.entries.get(key).await {
            None => Ok(None),
            Some(entry) => match entry.value.as_ref() {
                CacheValue::List(docs) => Ok(Some(docs.clone())),
                CacheValue::Document(_) => Err(CacheError::WrongType(key.to_string())),
            },
        }
    }

    async fn push_list(&self, key: &str, doc: String) -> CacheResult<()> {
        self.ensure_connected()?;
        let _guard = self.write_lock.lock().await;

        let entry = match self.entries.get(key).await {
            None => CacheEntry::new(CacheValue::List(vec![doc]), None),
            Some(existing) => match existing.value.as_ref() {
                CacheValue::List(docs) => {
                    let mut docs = docs.clone();
                    docs.push(doc);
                    CacheEntry {
                        value: Arc::new(CacheValue::List(docs)),
                        expires_at: existing.expires_at,
                    }
                }
                CacheValue::Document(_) => return Err(CacheError::WrongType(key.to_string())),
            },
        };

        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn set_list(&self, key: &str, docs: Vec<String>, ttl: Option<Duration>) -> CacheResult<()> {
        self.ensure_connected()?;
        self.entries
            .insert(key.to_string(), CacheEntry::new(CacheValue::List(docs), ttl))
            .await;
        Ok(())
    }

    async fn delete_key(&self, key: &str) -> CacheResult<bool> {
        self.ensure_connected()?;
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64> {
        self.ensure_connected()?;
        let removed = futures::future::join_all(keys.iter().map(|key| self.entries.remove(key))).await;
        let count = removed.iter().filter(|entry| entry.is_some()).count();
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        self.ensure_connected()?;
        let _guard = self.write_lock.lock().await;

        let Some(existing) = self.entries.get(key).await else {
            return Ok(false);
        };
        let entry = CacheEntry {
            value: existing.value,
            expires_at: Some(Instant::now() + ttl),
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(true)
    }

    async fn flush_all(&self) -> CacheResult<()> {
        self.ensure_connected()?;
        self.entries.invalidate_all();
        Ok(())
    }

    async fn connect(&self) -> CacheResult<()> {
        self.connected.store(true, Ordering::Release);
        tracing::debug!("cache connected");
        Ok(())
    }

    async fn disconnect(&self) -> CacheResult<()> {
        self.connected.store(false, Ordering::Release);
        tracing::debug!("cache disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}
