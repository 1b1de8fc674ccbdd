//! Domain layer for the music catalog
//!
//! This module contains the entity models, the error taxonomy, input
//! validation and the port traits adapters implement.

pub mod errors;
pub mod models;
pub mod ports;
pub mod validation;

pub use errors::{DomainError, DomainResult, ErrorKind};
