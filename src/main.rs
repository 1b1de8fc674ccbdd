//! Music catalog CLI entry point.

use clap::Parser;

use music_catalog::cli::{commands, handle_error, Cli, Commands};
use music_catalog::infrastructure::config::ConfigLoader;
use music_catalog::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the life of the process so file logs are flushed on exit.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Artist(args) => commands::artist::execute(args, &config, cli.json).await,
        Commands::Album(args) => commands::album::execute(args, &config, cli.json).await,
        Commands::Company(args) => commands::company::execute(args, &config, cli.json).await,
        Commands::Cache(args) => commands::cache::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
