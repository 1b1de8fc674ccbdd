//! Album domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::genre::MusicGenre;

/// An album released by one artist under one record company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: MusicGenre,
    /// Song titles in track order
    pub songs: Vec<String>,
    pub artist_id: Uuid,
    pub record_company_id: Uuid,
}

/// Validated input for creating an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlbum {
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: MusicGenre,
    pub songs: Vec<String>,
    pub artist_id: Uuid,
    pub record_company_id: Uuid,
}

/// Partial update for an album. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumPatch {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genre: Option<MusicGenre>,
    pub songs: Option<Vec<String>>,
    pub artist_id: Option<Uuid>,
    pub record_company_id: Option<Uuid>,
}

impl AlbumPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.release_date.is_none()
            && self.genre.is_none()
            && self.songs.is_none()
            && self.artist_id.is_none()
            && self.record_company_id.is_none()
    }

    pub fn apply_to(&self, album: &mut Album) {
        if let Some(title) = &self.title {
            album.title.clone_from(title);
        }
        if let Some(release_date) = self.release_date {
            album.release_date = release_date;
        }
        if let Some(genre) = self.genre {
            album.genre = genre;
        }
        if let Some(songs) = &self.songs {
            album.songs.clone_from(songs);
        }
        if let Some(artist_id) = self.artist_id {
            album.artist_id = artist_id;
        }
        if let Some(record_company_id) = self.record_company_id {
            album.record_company_id = record_company_id;
        }
    }
}
