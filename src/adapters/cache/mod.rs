//! In-memory cache adapter.
//!
//! Uses `moka` for concurrent caching with per-entry expiry.

pub mod moka_cache;

pub use moka_cache::MokaCatalogCache;
