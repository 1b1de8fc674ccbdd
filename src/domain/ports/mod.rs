//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - CatalogStore: persistence for artists, albums and record companies
//! - CatalogCache: document and list cache with expiry
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod catalog_cache;
pub mod catalog_store;

pub use catalog_cache::{CacheError, CacheResult, CatalogCache};
pub use catalog_store::{
    AlbumFilter, ArtistFilter, CascadeOutcome, CatalogStore, ParentCollection, RecordCompanyFilter,
    RelinkOutcome,
};
