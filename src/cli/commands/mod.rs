//! CLI command implementations.

pub mod album;
pub mod artist;
pub mod cache;
pub mod company;
pub mod init;

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::setup::CatalogContext;

/// Open the configured catalog for a single command.
pub(crate) async fn open_catalog(config: &Config) -> Result<CatalogContext> {
    CatalogContext::connect(config)
        .await
        .context("Failed to open catalog. Run 'music-catalog init' first.")
}
