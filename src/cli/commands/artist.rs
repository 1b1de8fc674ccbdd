//! Artist CLI commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::commands::open_catalog;
use crate::cli::output::{format_date, list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Album, Artist, Config};
use crate::services::{AddArtistInput, EditArtistInput};

#[derive(Args, Debug)]
pub struct ArtistArgs {
    #[command(subcommand)]
    pub command: ArtistCommands,
}

#[derive(Subcommand, Debug)]
pub enum ArtistCommands {
    /// Add a new artist
    Add {
        /// Artist name
        #[arg(short, long)]
        name: String,
        /// Formation date (M/D/YYYY)
        #[arg(short, long)]
        date_formed: String,
        /// Member name (repeat for each member)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// Edit an artist; omitted fields are left unchanged
    Edit {
        /// Artist ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        /// Formation date (M/D/YYYY)
        #[arg(short, long)]
        date_formed: Option<String>,
        /// Replacement member list (repeat for each member)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// Remove an artist and every album it released
    Remove {
        /// Artist ID
        id: String,
    },
    /// Show artist details with albums
    Show {
        /// Artist ID
        id: String,
    },
    /// List all artists
    List,
    /// Case-insensitive search on artist name
    Search {
        /// Substring to look for
        term: String,
    },
    /// List every song the artist has released
    Songs {
        /// Artist ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetailOutput {
    pub id: Uuid,
    pub name: String,
    pub date_formed: NaiveDate,
    pub members: Vec<String>,
    pub num_of_albums: u64,
    pub albums: Vec<Album>,
}

impl CommandOutput for ArtistDetailOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Artist: {}", self.name),
            format!("ID: {}", self.id),
            format!("Formed: {}", format_date(self.date_formed)),
            format!("Members: {}", self.members.join(", ")),
            format!("Albums: {}", self.num_of_albums),
        ];
        for album in &self.albums {
            lines.push(format!("  - {} ({})", album.title, format_date(album.release_date)));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ArtistListOutput {
    pub artists: Vec<Artist>,
    pub total: usize,
}

impl CommandOutput for ArtistListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "formed", "members"]);
        for artist in &self.artists {
            table.add_row(vec![
                artist.id.to_string(),
                truncate(&artist.name, 30),
                format_date(artist.date_formed),
                truncate(&artist.members.join(", "), 40),
            ]);
        }
        render_list("artist", "artists", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ArtistActionOutput {
    pub message: String,
    pub artist: Artist,
}

impl CommandOutput for ArtistActionOutput {
    fn to_human(&self) -> String {
        format!("{} ({})", self.message, self.artist.id)
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongsOutput {
    pub artist_id: String,
    pub songs: Vec<String>,
}

impl CommandOutput for SongsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} song(s):", self.songs.len())];
        lines.extend(self.songs.iter().map(|song| format!("  - {song}")));
        lines.join("\n")
    }
}

pub async fn execute(args: ArtistArgs, config: &Config, json_mode: bool) -> Result<()> {
    let catalog = open_catalog(config).await?;

    match args.command {
        ArtistCommands::Add { name, date_formed, members } => {
            let artist = catalog
                .pipeline
                .add_artist(AddArtistInput { name, date_formed, members })
                .await?;
            output(&ArtistActionOutput { message: format!("Added artist {}", artist.name), artist }, json_mode);
        }
        ArtistCommands::Edit { id, name, date_formed, members } => {
            let input = EditArtistInput {
                id,
                name,
                date_formed,
                members: (!members.is_empty()).then_some(members),
            };
            let artist = catalog.pipeline.edit_artist(input).await?;
            output(&ArtistActionOutput { message: format!("Updated artist {}", artist.name), artist }, json_mode);
        }
        ArtistCommands::Remove { id } => {
            let artist = catalog.pipeline.remove_artist(&id).await?;
            output(&ArtistActionOutput { message: format!("Removed artist {}", artist.name), artist }, json_mode);
        }
        ArtistCommands::Show { id } => {
            let artist = catalog.resolver.get_artist_by_id(&id).await?;
            let albums = catalog.resolver.artist_albums(&artist).await?;
            let num_of_albums = catalog.resolver.artist_num_of_albums(&artist).await?;
            let detail = ArtistDetailOutput {
                id: artist.id,
                name: artist.name,
                date_formed: artist.date_formed,
                members: artist.members,
                num_of_albums,
                albums,
            };
            output(&detail, json_mode);
        }
        ArtistCommands::List => {
            let artists = catalog.resolver.artists().await?;
            let total = artists.len();
            output(&ArtistListOutput { artists, total }, json_mode);
        }
        ArtistCommands::Search { term } => {
            let artists = catalog.resolver.search_artist_by_artist_name(&term).await?;
            let total = artists.len();
            output(&ArtistListOutput { artists, total }, json_mode);
        }
        ArtistCommands::Songs { id } => {
            let songs = catalog.resolver.get_songs_by_artist_id(&id).await?;
            output(&SongsOutput { artist_id: id, songs }, json_mode);
        }
    }

    Ok(())
}
