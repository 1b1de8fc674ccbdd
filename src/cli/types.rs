//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::album::AlbumArgs;
use crate::cli::commands::artist::ArtistArgs;
use crate::cli::commands::cache::CacheArgs;
use crate::cli::commands::company::CompanyArgs;
use crate::cli::commands::init::InitArgs;

#[derive(Parser, Debug)]
#[command(name = "music-catalog")]
#[command(about = "Music catalog of artists, albums and record companies", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize catalog configuration and database
    Init(InitArgs),

    /// Artist commands
    Artist(ArtistArgs),

    /// Album commands
    Album(AlbumArgs),

    /// Record company commands
    Company(CompanyArgs),

    /// Cache maintenance
    Cache(CacheArgs),
}
