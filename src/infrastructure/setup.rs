//! Project initialization and service wiring.
//!
//! `init` lays down the `.catalog/` directory, a default config file and a
//! migrated database. `CatalogContext` builds the resolver and pipeline from
//! a loaded configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::cache::MokaCatalogCache;
use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteCatalogStore};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;
use crate::services::{CacheContext, CatalogResolver, MutationPipeline};

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Music catalog configuration
# Override settings by editing this file, adding .catalog/local.yaml, or
# setting environment variables with the CATALOG_ prefix
#
# Example environment variables:
#   export CATALOG_DATABASE__PATH=/custom/path/catalog.db
#   export CATALOG_CACHE__TTL_SECS=600
#   export CATALOG_LOGGING__LEVEL=debug

# Database configuration
database:
  # Path to SQLite database file (project-local)
  path: ".catalog/catalog.db"

  # Maximum number of database connections in pool
  max_connections: 5

# Cache configuration
cache:
  # Expiry applied to every populated key, in seconds
  ttl_secs: 3600

  # Maximum number of keys held at once
  max_capacity: 10000

  # Reconnect attempts before a cache call fails open
  reconnect_attempts: 1

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "pretty"
"#;

/// Setup paths and directories
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Paths rooted at `root`.
    pub fn under(root: &Path) -> Self {
        let config_dir = root.join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("catalog.db"),
            config_dir,
        }
    }

    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::under(&current_dir))
    }

    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(())
}

/// Create the default configuration file
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<()> {
    if paths.config_file.exists() && !force {
        return Ok(());
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(())
}

/// Create the database file and apply the schema.
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let db_url = format!("sqlite:{}", paths.database_file.display());
    let pool = initialize_database(&db_url, None)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;
    Ok(())
}

/// The wired read and write services over one store and one cache.
pub struct CatalogContext {
    pub resolver: CatalogResolver<SqliteCatalogStore, MokaCatalogCache>,
    pub pipeline: MutationPipeline<SqliteCatalogStore, MokaCatalogCache>,
    pub cache: Arc<CacheContext<MokaCatalogCache>>,
    pub store: Arc<SqliteCatalogStore>,
}

impl CatalogContext {
    /// Open the configured database and build the services around it.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = initialize_database(&config.database.url(), Some(PoolConfig::from(&config.database)))
            .await
            .context("Failed to initialize database")?;

        let store = Arc::new(SqliteCatalogStore::new(pool));
        let cache = Arc::new(MokaCatalogCache::from_config(&config.cache));
        Ok(Self::from_parts(store, cache, config))
    }

    pub fn from_parts(store: Arc<SqliteCatalogStore>, cache: Arc<MokaCatalogCache>, config: &Config) -> Self {
        let cache = Arc::new(CacheContext::new(cache, &config.cache));
        Self {
            resolver: CatalogResolver::new(Arc::clone(&store), Arc::clone(&cache)),
            pipeline: MutationPipeline::new(Arc::clone(&store), Arc::clone(&cache)),
            cache,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConfigLoader;

    #[tokio::test]
    async fn test_init_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SetupPaths::under(dir.path());
        assert!(!paths.is_initialized());

        create_config_dir(&paths).unwrap();
        create_config_file(&paths, false).unwrap();
        run_migrations(&paths).await.unwrap();
        assert!(paths.is_initialized());

        let config = ConfigLoader::load_from_file(&paths.config_file).unwrap();
        assert_eq!(config.cache.ttl_secs, 3600);
    }

    #[test]
    fn test_existing_config_is_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SetupPaths::under(dir.path());
        create_config_dir(&paths).unwrap();
        fs::write(&paths.config_file, "cache:\n  ttl_secs: 5\n").unwrap();

        create_config_file(&paths, false).unwrap();
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("ttl_secs: 5"));

        create_config_file(&paths, true).unwrap();
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("ttl_secs: 3600"));
    }

    #[tokio::test]
    async fn test_connect_with_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("catalog.db").display().to_string();

        let ctx = CatalogContext::connect(&config).await.unwrap();
        assert!(ctx.resolver.artists().await.unwrap().is_empty());
    }
}
