//! Album CLI commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::commands::open_catalog;
use crate::cli::output::{format_date, list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{Album, Artist, Config, MusicGenre, RecordCompany};
use crate::services::{AddAlbumInput, EditAlbumInput};

#[derive(Args, Debug)]
pub struct AlbumArgs {
    #[command(subcommand)]
    pub command: AlbumCommands,
}

#[derive(Subcommand, Debug)]
pub enum AlbumCommands {
    /// Add a new album
    Add {
        /// Album title
        #[arg(short, long)]
        title: String,
        /// Release date (M/D/YYYY)
        #[arg(short, long)]
        release_date: String,
        /// Genre (POP, ROCK, HIP_HOP, COUNTRY, JAZZ, CLASSICAL, ELECTRONIC, R_AND_B, INDIE, ALTERNATIVE)
        #[arg(short, long)]
        genre: String,
        /// Song title (repeat for each song, in track order)
        #[arg(short, long = "song")]
        songs: Vec<String>,
        /// Artist ID
        #[arg(short, long)]
        artist: String,
        /// Record company ID
        #[arg(short, long)]
        company: String,
    },
    /// Edit an album; omitted fields are left unchanged
    Edit {
        /// Album ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        /// Release date (M/D/YYYY)
        #[arg(short, long)]
        release_date: Option<String>,
        #[arg(short, long)]
        genre: Option<String>,
        /// Replacement track list (repeat for each song)
        #[arg(short, long = "song")]
        songs: Vec<String>,
        /// Move the album to another artist
        #[arg(short, long)]
        artist: Option<String>,
        /// Move the album to another record company
        #[arg(short, long)]
        company: Option<String>,
    },
    /// Remove an album
    Remove {
        /// Album ID
        id: String,
    },
    /// Show album details with its artist and record company
    Show {
        /// Album ID
        id: String,
    },
    /// List all albums
    List,
    /// List albums of one genre
    Genre {
        /// Genre name, case-insensitive
        genre: String,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetailOutput {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: MusicGenre,
    pub songs: Vec<String>,
    pub artist: Artist,
    pub record_company: RecordCompany,
}

impl CommandOutput for AlbumDetailOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Album: {}", self.title),
            format!("ID: {}", self.id),
            format!("Released: {}", format_date(self.release_date)),
            format!("Genre: {}", self.genre),
            format!("Artist: {} ({})", self.artist.name, self.artist.id),
            format!("Record company: {} ({})", self.record_company.name, self.record_company.id),
            "Songs:".to_string(),
        ];
        for (track, song) in self.songs.iter().enumerate() {
            lines.push(format!("  {:>2}. {song}", track + 1));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AlbumListOutput {
    pub albums: Vec<Album>,
    pub total: usize,
}

impl CommandOutput for AlbumListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "title", "released", "genre", "songs"]);
        for album in &self.albums {
            table.add_row(vec![
                album.id.to_string(),
                truncate(&album.title, 30),
                format_date(album.release_date),
                album.genre.to_string(),
                album.songs.len().to_string(),
            ]);
        }
        render_list("album", "albums", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AlbumActionOutput {
    pub message: String,
    pub album: Album,
}

impl CommandOutput for AlbumActionOutput {
    fn to_human(&self) -> String {
        format!("{} ({})", self.message, self.album.id)
    }
}

pub async fn execute(args: AlbumArgs, config: &Config, json_mode: bool) -> Result<()> {
    let catalog = open_catalog(config).await?;

    match args.command {
        AlbumCommands::Add { title, release_date, genre, songs, artist, company } => {
            let input = AddAlbumInput {
                title,
                release_date,
                genre,
                songs,
                artist_id: artist,
                record_company_id: company,
            };
            let album = catalog.pipeline.add_album(input).await?;
            output(&AlbumActionOutput { message: format!("Added album {}", album.title), album }, json_mode);
        }
        AlbumCommands::Edit { id, title, release_date, genre, songs, artist, company } => {
            let input = EditAlbumInput {
                id,
                title,
                release_date,
                genre,
                songs: (!songs.is_empty()).then_some(songs),
                artist_id: artist,
                record_company_id: company,
            };
            let album = catalog.pipeline.edit_album(input).await?;
            output(&AlbumActionOutput { message: format!("Updated album {}", album.title), album }, json_mode);
        }
        AlbumCommands::Remove { id } => {
            let album = catalog.pipeline.remove_album(&id).await?;
            output(&AlbumActionOutput { message: format!("Removed album {}", album.title), album }, json_mode);
        }
        AlbumCommands::Show { id } => {
            let album = catalog.resolver.get_album_by_id(&id).await?;
            let artist = catalog.resolver.album_artist(&album).await?;
            let record_company = catalog.resolver.album_record_company(&album).await?;
            let detail = AlbumDetailOutput {
                id: album.id,
                title: album.title,
                release_date: album.release_date,
                genre: album.genre,
                songs: album.songs,
                artist,
                record_company,
            };
            output(&detail, json_mode);
        }
        AlbumCommands::List => {
            let albums = catalog.resolver.albums().await?;
            let total = albums.len();
            output(&AlbumListOutput { albums, total }, json_mode);
        }
        AlbumCommands::Genre { genre } => {
            let albums = catalog.resolver.albums_by_genre(&genre).await?;
            let total = albums.len();
            output(&AlbumListOutput { albums, total }, json_mode);
        }
    }

    Ok(())
}
