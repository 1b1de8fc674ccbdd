//! Music catalog: artists, albums and record companies behind a cache-aside
//! read layer.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, validation, errors and the store/cache ports
//! - **Adapter Layer** (`adapters`): SQLite store and in-process moka cache
//! - **Service Layer** (`services`): read resolver, mutation pipeline and fail-open cache access
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and wiring
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, ErrorKind};
pub use domain::models::{Album, Artist, CacheKey, Config, MusicGenre, RecordCompany};
pub use domain::ports::{CatalogCache, CatalogStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::setup::CatalogContext;
pub use services::{CacheContext, CatalogResolver, MutationPipeline};
