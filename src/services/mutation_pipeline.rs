//! Write side of the catalog.
//!
//! Each mutation runs the same stages: field validation, referential checks,
//! business rules, the store write (with back-reference upkeep), then cache
//! invalidation. Nothing touches the store or the cache until validation
//! has passed.

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Album, AlbumPatch, Artist, ArtistPatch, CacheKey, NewAlbum, NewArtist, NewRecordCompany, RecordCompany,
    RecordCompanyPatch,
};
use crate::domain::ports::{CatalogCache, CatalogStore};
use crate::domain::validation::{
    check_date, check_formation_date, check_founded_year, check_genre, check_id, check_list, check_name,
    check_string,
};
use crate::services::cache_context::CacheContext;

#[derive(Debug, Clone, Default)]
pub struct AddArtistInput {
    pub name: String,
    pub date_formed: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EditArtistInput {
    pub id: String,
    pub name: Option<String>,
    pub date_formed: Option<String>,
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct AddAlbumInput {
    pub title: String,
    pub release_date: String,
    pub genre: String,
    pub songs: Vec<String>,
    pub artist_id: String,
    pub record_company_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditAlbumInput {
    pub id: String,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub songs: Option<Vec<String>>,
    pub artist_id: Option<String>,
    pub record_company_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AddCompanyInput {
    pub name: String,
    pub founded_year: i32,
    pub country: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditCompanyInput {
    pub id: String,
    pub name: Option<String>,
    pub founded_year: Option<i32>,
    pub country: Option<String>,
}

fn validate_artist_date(value: &str) -> DomainResult<chrono::NaiveDate> {
    check_formation_date(check_date(value, "Date Formed")?)
}

pub struct MutationPipeline<S: CatalogStore, C: CatalogCache> {
    store: Arc<S>,
    cache: Arc<CacheContext<C>>,
}

impl<S: CatalogStore, C: CatalogCache> MutationPipeline<S, C> {
    pub fn new(store: Arc<S>, cache: Arc<CacheContext<C>>) -> Self {
        Self { store, cache }
    }

    async fn resolve_artist(&self, id: Uuid) -> DomainResult<Artist> {
        self.store
            .find_artist(id)
            .await?
            .ok_or(DomainError::UnresolvedReference { entity: "Artist", id })
    }

    async fn resolve_record_company(&self, id: Uuid) -> DomainResult<RecordCompany> {
        self.store
            .find_record_company(id)
            .await?
            .ok_or(DomainError::UnresolvedReference { entity: "Record Company", id })
    }

    fn check_release_after_formation(album_release: chrono::NaiveDate, artist: &Artist) -> DomainResult<()> {
        if album_release < artist.date_formed {
            return Err(DomainError::ValidationFailed(
                "Release date cannot be before the artist was formed".to_string(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Artists
    // -----------------------------------------------------------------------

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_artist(&self, input: AddArtistInput) -> DomainResult<Artist> {
        let new = NewArtist {
            name: check_string(&input.name, "Name")?,
            date_formed: validate_artist_date(&input.date_formed)?,
            members: check_list(&input.members, "Member Name", check_name)?,
        };

        let id = self.store.insert_artist(&new).await?;
        let artist = Artist {
            id,
            name: new.name,
            date_formed: new.date_formed,
            members: new.members,
            albums: Vec::new(),
        };

        self.cache.write(&CacheKey::Artist(id), &artist).await;
        self.cache.invalidate(&[CacheKey::Artists]).await;

        tracing::info!(artist_id = %id, "added artist");
        Ok(artist)
    }

    #[instrument(skip(self, input), fields(id = %input.id))]
    pub async fn edit_artist(&self, input: EditArtistInput) -> DomainResult<Artist> {
        let id = check_id(&input.id)?;
        let patch = ArtistPatch {
            name: input.name.as_deref().map(|v| check_string(v, "Name")).transpose()?,
            date_formed: input.date_formed.as_deref().map(validate_artist_date).transpose()?,
            members: input
                .members
                .as_deref()
                .map(|v| check_list(v, "Member Name", check_name))
                .transpose()?,
        };

        if patch.is_empty() {
            return self.store.find_artist(id).await?.ok_or(DomainError::ArtistNotFound(id));
        }

        let artist = self.store.update_artist(id, &patch).await?;

        self.cache.write(&CacheKey::Artist(id), &artist).await;
        self.cache.invalidate(&[CacheKey::Artists]).await;

        tracing::info!(artist_id = %id, "edited artist");
        Ok(artist)
    }

    /// Deletes the artist together with every album it released.
    #[instrument(skip(self))]
    pub async fn remove_artist(&self, id: &str) -> DomainResult<Artist> {
        let id = check_id(id)?;
        let outcome = self.store.cascade_delete_artist(id).await?;

        let mut keys = vec![CacheKey::Artist(id), CacheKey::Artists];
        if !outcome.albums.is_empty() {
            keys.extend(outcome.albums.iter().map(|album| CacheKey::Album(album.id)));
            keys.push(CacheKey::Albums);
        }
        if !outcome.pruned_parents.is_empty() {
            keys.extend(outcome.pruned_parents.iter().map(|&company| CacheKey::RecordCompany(company)));
            keys.push(CacheKey::RecordCompanies);
        }
        self.cache.invalidate(&keys).await;

        tracing::info!(artist_id = %id, albums = outcome.albums.len(), "removed artist");
        Ok(outcome.deleted)
    }

    // -----------------------------------------------------------------------
    // Albums
    // -----------------------------------------------------------------------

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn add_album(&self, input: AddAlbumInput) -> DomainResult<Album> {
        let new = NewAlbum {
            title: check_string(&input.title, "Title")?,
            release_date: check_date(&input.release_date, "Release Date")?,
            genre: check_genre(&input.genre)?,
            songs: check_list(&input.songs, "Song", check_string)?,
            artist_id: check_id(&input.artist_id)?,
            record_company_id: check_id(&input.record_company_id)?,
        };

        let artist = self.resolve_artist(new.artist_id).await?;
        self.resolve_record_company(new.record_company_id).await?;
        Self::check_release_after_formation(new.release_date, &artist)?;

        let album = self.store.insert_linked_album(&new).await?;

        self.cache.write(&CacheKey::Album(album.id), &album).await;
        self.cache
            .invalidate(&[
                CacheKey::Albums,
                CacheKey::Artist(album.artist_id),
                CacheKey::Artists,
                CacheKey::RecordCompany(album.record_company_id),
                CacheKey::RecordCompanies,
            ])
            .await;

        tracing::info!(album_id = %album.id, artist_id = %album.artist_id, "added album");
        Ok(album)
    }

    #[instrument(skip(self, input), fields(id = %input.id))]
    pub async fn edit_album(&self, input: EditAlbumInput) -> DomainResult<Album> {
        let id = check_id(&input.id)?;
        let patch = AlbumPatch {
            title: input.title.as_deref().map(|v| check_string(v, "Title")).transpose()?,
            release_date: input
                .release_date
                .as_deref()
                .map(|v| check_date(v, "Release Date"))
                .transpose()?,
            genre: input.genre.as_deref().map(check_genre).transpose()?,
            songs: input.songs.as_deref().map(|v| check_list(v, "Song", check_string)).transpose()?,
            artist_id: input.artist_id.as_deref().map(check_id).transpose()?,
            record_company_id: input.record_company_id.as_deref().map(check_id).transpose()?,
        };

        let current = self.store.find_album(id).await?.ok_or(DomainError::AlbumNotFound(id))?;
        if patch.is_empty() {
            return Ok(current);
        }

        if let Some(company_id) = patch.record_company_id {
            self.resolve_record_company(company_id).await?;
        }
        if patch.artist_id.is_some() || patch.release_date.is_some() {
            let artist = self.resolve_artist(patch.artist_id.unwrap_or(current.artist_id)).await?;
            Self::check_release_after_formation(patch.release_date.unwrap_or(current.release_date), &artist)?;
        }

        let outcome = self.store.relink_album(id, &patch).await?;

        let mut keys = vec![CacheKey::Albums];
        if outcome.artist_changed() {
            keys.push(CacheKey::Artist(outcome.previous.artist_id));
            keys.push(CacheKey::Artist(outcome.updated.artist_id));
            keys.push(CacheKey::Artists);
        }
        if outcome.record_company_changed() {
            keys.push(CacheKey::RecordCompany(outcome.previous.record_company_id));
            keys.push(CacheKey::RecordCompany(outcome.updated.record_company_id));
            keys.push(CacheKey::RecordCompanies);
        }
        self.cache.write(&CacheKey::Album(id), &outcome.updated).await;
        self.cache.invalidate(&keys).await;

        tracing::info!(album_id = %id, "edited album");
        Ok(outcome.updated)
    }

    #[instrument(skip(self))]
    pub async fn remove_album(&self, id: &str) -> DomainResult<Album> {
        let id = check_id(id)?;
        let album = self.store.delete_linked_album(id).await?;

        self.cache
            .invalidate(&[
                CacheKey::Album(id),
                CacheKey::Albums,
                CacheKey::Artist(album.artist_id),
                CacheKey::Artists,
                CacheKey::RecordCompany(album.record_company_id),
                CacheKey::RecordCompanies,
            ])
            .await;

        tracing::info!(album_id = %id, "removed album");
        Ok(album)
    }

    // -----------------------------------------------------------------------
    // Record companies
    // -----------------------------------------------------------------------

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_company(&self, input: AddCompanyInput) -> DomainResult<RecordCompany> {
        let new = NewRecordCompany {
            name: check_name(&input.name, "Name")?,
            founded_year: check_founded_year(input.founded_year)?,
            country: check_string(&input.country, "Country")?,
        };

        let id = self.store.insert_record_company(&new).await?;
        let company = RecordCompany {
            id,
            name: new.name,
            founded_year: new.founded_year,
            country: new.country,
            albums: Vec::new(),
        };

        self.cache.write(&CacheKey::RecordCompany(id), &company).await;
        self.cache.invalidate(&[CacheKey::RecordCompanies]).await;

        tracing::info!(record_company_id = %id, "added record company");
        Ok(company)
    }

    #[instrument(skip(self, input), fields(id = %input.id))]
    pub async fn edit_company(&self, input: EditCompanyInput) -> DomainResult<RecordCompany> {
        let id = check_id(&input.id)?;
        let patch = RecordCompanyPatch {
            name: input.name.as_deref().map(|v| check_name(v, "Name")).transpose()?,
            founded_year: input.founded_year.map(check_founded_year).transpose()?,
            country: input.country.as_deref().map(|v| check_string(v, "Country")).transpose()?,
        };

        if patch.is_empty() {
            return self
                .store
                .find_record_company(id)
                .await?
                .ok_or(DomainError::RecordCompanyNotFound(id));
        }

        let company = self.store.update_record_company(id, &patch).await?;

        self.cache.write(&CacheKey::RecordCompany(id), &company).await;
        self.cache.invalidate(&[CacheKey::RecordCompanies]).await;

        tracing::info!(record_company_id = %id, "edited record company");
        Ok(company)
    }

    /// Deletes the company and every album it published, then flushes the
    /// whole cache.
    #[instrument(skip(self))]
    pub async fn remove_company(&self, id: &str) -> DomainResult<RecordCompany> {
        let id = check_id(id)?;
        let outcome = self.store.cascade_delete_record_company(id).await?;

        self.cache.flush().await;

        tracing::info!(record_company_id = %id, albums = outcome.albums.len(), "removed record company");
        Ok(outcome.deleted)
    }
}
