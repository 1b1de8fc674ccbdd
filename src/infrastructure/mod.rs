//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Project setup and service wiring

pub mod config;
pub mod logging;
pub mod setup;
