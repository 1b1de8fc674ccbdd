//! Implementation of the `music-catalog init` command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_dir, create_config_file, run_migrations, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.success {
            lines.push(format!("\nConfig:   {}", self.config_file.display()));
            lines.push(format!("Database: {}", self.database_file.display()));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let paths = SetupPaths::new()?;

    if paths.is_initialized() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Catalog already initialized. Use --force to rewrite the config.".to_string(),
            config_file: paths.config_file,
            database_file: paths.database_file,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    create_config_dir(&paths)?;
    create_config_file(&paths, args.force)?;
    run_migrations(&paths).await?;

    tracing::info!(path = %paths.config_dir.display(), "catalog initialized");

    let output_data = InitOutput {
        success: true,
        message: "Catalog initialized successfully.".to_string(),
        config_file: paths.config_file,
        database_file: paths.database_file,
    };
    output(&output_data, json_mode);
    Ok(())
}
