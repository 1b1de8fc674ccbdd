//! Cache CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::commands::open_catalog;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Drop every cached entry
    Flush,
}

#[derive(Debug, serde::Serialize)]
pub struct CacheActionOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for CacheActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: CacheArgs, config: &Config, json_mode: bool) -> Result<()> {
    let catalog = open_catalog(config).await?;

    match args.command {
        CacheCommands::Flush => {
            catalog.cache.flush().await;
            let output_data = CacheActionOutput { success: true, message: "Cache flushed.".to_string() };
            output(&output_data, json_mode);
        }
    }

    Ok(())
}
