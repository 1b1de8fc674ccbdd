//! Entity store port.
//!
//! Persistence for the three catalog collections. Entities come back with
//! their public `id` already assigned; there is no separate internal id.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Album, AlbumPatch, Artist, ArtistPatch, MusicGenre, NewAlbum, NewArtist, NewRecordCompany,
    RecordCompany, RecordCompanyPatch,
};

/// Collections that carry a back-reference list of album ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentCollection {
    Artists,
    RecordCompanies,
}

impl ParentCollection {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Artists => "artists",
            Self::RecordCompanies => "record_companies",
        }
    }
}

/// Filter criteria for listing artists.
#[derive(Debug, Clone, Default)]
pub struct ArtistFilter {
    /// Case-insensitive substring of the artist name
    pub name_contains: Option<String>,
}

/// Filter criteria for listing albums.
#[derive(Debug, Clone, Default)]
pub struct AlbumFilter {
    pub artist_id: Option<Uuid>,
    pub record_company_id: Option<Uuid>,
    pub genre: Option<MusicGenre>,
}

impl AlbumFilter {
    pub fn by_artist(artist_id: Uuid) -> Self {
        Self { artist_id: Some(artist_id), ..Default::default() }
    }

    pub fn by_record_company(record_company_id: Uuid) -> Self {
        Self { record_company_id: Some(record_company_id), ..Default::default() }
    }

    pub fn by_genre(genre: MusicGenre) -> Self {
        Self { genre: Some(genre), ..Default::default() }
    }
}

/// Filter criteria for listing record companies.
#[derive(Debug, Clone, Default)]
pub struct RecordCompanyFilter {
    pub founded_min: Option<i32>,
    pub founded_max: Option<i32>,
}

/// Result of deleting a parent entity together with its dependent albums.
#[derive(Debug, Clone)]
pub struct CascadeOutcome<T> {
    /// The deleted parent
    pub deleted: T,
    /// Albums removed because they referenced the parent
    pub albums: Vec<Album>,
    /// Parents of the other type whose back-reference lists were pruned
    pub pruned_parents: Vec<Uuid>,
}

/// Result of an album edit that may have moved it between parents.
#[derive(Debug, Clone)]
pub struct RelinkOutcome {
    pub previous: Album,
    pub updated: Album,
}

impl RelinkOutcome {
    pub fn artist_changed(&self) -> bool {
        self.previous.artist_id != self.updated.artist_id
    }

    pub fn record_company_changed(&self) -> bool {
        self.previous.record_company_id != self.updated.record_company_id
    }
}

/// Repository interface for catalog persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // Artist operations

    /// Insert an artist with an empty back-reference list. Returns the assigned id.
    async fn insert_artist(&self, artist: &NewArtist) -> DomainResult<Uuid>;

    async fn find_artist(&self, id: Uuid) -> DomainResult<Option<Artist>>;

    /// Artists matching the filter, in insertion order.
    async fn find_artists(&self, filter: ArtistFilter) -> DomainResult<Vec<Artist>>;

    /// Apply a partial update; fails with `ArtistNotFound` if absent.
    async fn update_artist(&self, id: Uuid, patch: &ArtistPatch) -> DomainResult<Artist>;

    /// Delete a single artist row; fails with `ArtistNotFound` if absent.
    async fn delete_artist(&self, id: Uuid) -> DomainResult<Artist>;

    // Record company operations

    async fn insert_record_company(&self, company: &NewRecordCompany) -> DomainResult<Uuid>;

    async fn find_record_company(&self, id: Uuid) -> DomainResult<Option<RecordCompany>>;

    async fn find_record_companies(&self, filter: RecordCompanyFilter) -> DomainResult<Vec<RecordCompany>>;

    async fn update_record_company(&self, id: Uuid, patch: &RecordCompanyPatch) -> DomainResult<RecordCompany>;

    async fn delete_record_company(&self, id: Uuid) -> DomainResult<RecordCompany>;

    // Album operations

    /// Insert an album row only. Back-references are not touched.
    async fn insert_album(&self, album: &NewAlbum) -> DomainResult<Uuid>;

    async fn find_album(&self, id: Uuid) -> DomainResult<Option<Album>>;

    /// Albums matching the filter, in insertion order.
    async fn find_albums(&self, filter: AlbumFilter) -> DomainResult<Vec<Album>>;

    async fn count_albums(&self, filter: AlbumFilter) -> DomainResult<u64>;

    async fn update_album(&self, id: Uuid, patch: &AlbumPatch) -> DomainResult<Album>;

    /// Delete an album row only. Back-references are not touched.
    async fn delete_album(&self, id: Uuid) -> DomainResult<Album>;

    // Back-reference maintenance

    /// Append `album_id` to one parent's back-reference list.
    async fn push_reference(&self, collection: ParentCollection, parent_id: Uuid, album_id: Uuid) -> DomainResult<()>;

    /// Remove `album_id` from every back-reference list in `collection`.
    /// Returns the number of parents modified.
    async fn pull_reference(&self, collection: ParentCollection, album_id: Uuid) -> DomainResult<u64>;

    // Compound writes, each applied atomically

    /// Insert an album and push its id onto both parents' back-references.
    async fn insert_linked_album(&self, album: &NewAlbum) -> DomainResult<Album>;

    /// Update an album, moving its id between parents' back-references when
    /// the artist or record company changes.
    async fn relink_album(&self, id: Uuid, patch: &AlbumPatch) -> DomainResult<RelinkOutcome>;

    /// Delete an album and pull its id from both parents' back-references.
    async fn delete_linked_album(&self, id: Uuid) -> DomainResult<Album>;

    /// Delete an artist, every album it released, and those album ids from
    /// record company back-references.
    async fn cascade_delete_artist(&self, id: Uuid) -> DomainResult<CascadeOutcome<Artist>>;

    /// Delete a record company, every album released under it, and those
    /// album ids from artist back-references.
    async fn cascade_delete_record_company(&self, id: Uuid) -> DomainResult<CascadeOutcome<RecordCompany>>;
}
