//! Cache port.
//!
//! A key/value store for serialized documents and a key/list store for
//! ordered sequences of documents, both with optional expiry. The cache is a
//! pure performance layer and never the system of record.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache unavailable")]
    Unavailable,

    #[error("Key {0} holds a value of the wrong type")]
    WrongType(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Fetch a single serialized document.
    async fn get_doc(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a single serialized document, replacing whatever the key held.
    async fn set_doc(&self, key: &str, doc: String, ttl: Option<Duration>) -> CacheResult<()>;

    /// Fetch an ordered list of serialized documents.
    async fn get_list(&self, key: &str) -> CacheResult<Option<Vec<String>>>;

    /// Append one document to the tail of a list, creating it if absent.
    /// An existing expiry is kept.
    async fn push_list(&self, key: &str, doc: String) -> CacheResult<()>;

    /// Replace a list with a fully built sequence in one step.
    async fn set_list(&self, key: &str, docs: Vec<String>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Returns whether the key existed.
    async fn delete_key(&self, key: &str) -> CacheResult<bool>;

    /// Returns how many of the keys existed.
    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64>;

    /// Set the expiry of an existing key. Returns false if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool>;

    async fn flush_all(&self) -> CacheResult<()>;

    // Connection lifecycle

    async fn connect(&self) -> CacheResult<()>;

    async fn disconnect(&self) -> CacheResult<()>;

    fn is_connected(&self) -> bool;
}
