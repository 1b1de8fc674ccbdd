//! Read side of the catalog: cache-aside lookups and relationship fields.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Album, Artist, CacheKey, RecordCompany};
use crate::domain::ports::{AlbumFilter, ArtistFilter, CatalogCache, CatalogStore, RecordCompanyFilter};
use crate::domain::validation::{check_genre, check_id, check_year_range};
use crate::services::cache_context::CacheContext;

pub struct CatalogResolver<S: CatalogStore, C: CatalogCache> {
    store: Arc<S>,
    cache: Arc<CacheContext<C>>,
}

impl<S: CatalogStore, C: CatalogCache> CatalogResolver<S, C> {
    pub fn new(store: Arc<S>, cache: Arc<CacheContext<C>>) -> Self {
        Self { store, cache }
    }

    /// Cache-aside for a single document. Concurrent misses on one key
    /// share a single store load.
    async fn cached<T, F, Fut>(&self, key: CacheKey, load: F) -> DomainResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        if let Some(hit) = self.cache.read(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let _guard = self.cache.lock(&key).await;
        if let Some(hit) = self.cache.read(&key).await {
            tracing::debug!(key = %key, "cache hit after wait");
            return Ok(hit);
        }

        tracing::debug!(key = %key, "cache miss");
        let value = load().await?;
        self.cache.write(&key, &value).await;
        Ok(value)
    }

    /// Cache-aside for a list key, written whole once loaded.
    async fn cached_list<T, F, Fut>(&self, key: CacheKey, load: F) -> DomainResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<Vec<T>>>,
    {
        if let Some(hit) = self.cache.read_list(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let _guard = self.cache.lock(&key).await;
        if let Some(hit) = self.cache.read_list(&key).await {
            tracing::debug!(key = %key, "cache hit after wait");
            return Ok(hit);
        }

        tracing::debug!(key = %key, "cache miss");
        let values = load().await?;
        self.cache.write_list(&key, &values).await;
        Ok(values)
    }

    // -----------------------------------------------------------------------
    // Single entities
    // -----------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_artist_by_id(&self, id: &str) -> DomainResult<Artist> {
        let id = check_id(id)?;
        self.cached(CacheKey::Artist(id), || async {
            self.store.find_artist(id).await?.ok_or(DomainError::ArtistNotFound(id))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_album_by_id(&self, id: &str) -> DomainResult<Album> {
        let id = check_id(id)?;
        self.cached(CacheKey::Album(id), || async {
            self.store.find_album(id).await?.ok_or(DomainError::AlbumNotFound(id))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_company_by_id(&self, id: &str) -> DomainResult<RecordCompany> {
        let id = check_id(id)?;
        self.cached(CacheKey::RecordCompany(id), || async {
            self.store
                .find_record_company(id)
                .await?
                .ok_or(DomainError::RecordCompanyNotFound(id))
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Full collections
    // -----------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn artists(&self) -> DomainResult<Vec<Artist>> {
        self.cached(CacheKey::Artists, || self.store.find_artists(ArtistFilter::default()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn albums(&self) -> DomainResult<Vec<Album>> {
        self.cached(CacheKey::Albums, || self.store.find_albums(AlbumFilter::default()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn record_companies(&self) -> DomainResult<Vec<RecordCompany>> {
        self.cached(CacheKey::RecordCompanies, || {
            self.store.find_record_companies(RecordCompanyFilter::default())
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Secondary indexes. Zero matches is NotFound, never an empty list.
    // -----------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_songs_by_artist_id(&self, artist_id: &str) -> DomainResult<Vec<String>> {
        let artist_id = check_id(artist_id)?;
        self.cached_list(CacheKey::SongsByArtist(artist_id), || async {
            let albums = self.store.find_albums(AlbumFilter::by_artist(artist_id)).await?;
            if albums.is_empty() {
                return Err(DomainError::NoMatches(format!("No albums found for artist {artist_id}")));
            }
            Ok(albums.into_iter().flat_map(|album| album.songs).collect::<Vec<String>>())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn albums_by_genre(&self, genre: &str) -> DomainResult<Vec<Album>> {
        let genre = check_genre(genre)?;
        self.cached_list(CacheKey::Genre(genre), || async {
            let albums = self.store.find_albums(AlbumFilter::by_genre(genre)).await?;
            if albums.is_empty() {
                return Err(DomainError::NoMatches(format!("No albums found for genre {genre}")));
            }
            Ok(albums)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn company_by_founded_year(&self, min: i32, max: i32) -> DomainResult<Vec<RecordCompany>> {
        let (min, max) = check_year_range(min, max)?;
        self.cached_list(CacheKey::FoundedYearRange { min, max }, || async {
            let filter = RecordCompanyFilter { founded_min: Some(min), founded_max: Some(max) };
            let companies = self.store.find_record_companies(filter).await?;
            if companies.is_empty() {
                return Err(DomainError::NoMatches(format!(
                    "No record companies founded between {min} and {max}"
                )));
            }
            Ok(companies)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn search_artist_by_artist_name(&self, term: &str) -> DomainResult<Vec<Artist>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DomainError::ValidationFailed("Search term cannot be empty".to_string()));
        }

        self.cached_list(CacheKey::artist_search(term), || async {
            let filter = ArtistFilter { name_contains: Some(term.to_string()) };
            let artists = self.store.find_artists(filter).await?;
            if artists.is_empty() {
                return Err(DomainError::NoMatches(format!("No artists match \"{term}\"")));
            }
            Ok(artists)
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Relationship fields, resolved per parent straight from the store
    // -----------------------------------------------------------------------

    pub async fn album_artist(&self, album: &Album) -> DomainResult<Artist> {
        self.store
            .find_artist(album.artist_id)
            .await?
            .ok_or(DomainError::UnresolvedReference { entity: "Artist", id: album.artist_id })
    }

    pub async fn album_record_company(&self, album: &Album) -> DomainResult<RecordCompany> {
        self.store
            .find_record_company(album.record_company_id)
            .await?
            .ok_or(DomainError::UnresolvedReference {
                entity: "Record Company",
                id: album.record_company_id,
            })
    }

    pub async fn artist_albums(&self, artist: &Artist) -> DomainResult<Vec<Album>> {
        self.store.find_albums(AlbumFilter::by_artist(artist.id)).await
    }

    pub async fn artist_num_of_albums(&self, artist: &Artist) -> DomainResult<u64> {
        self.store.count_albums(AlbumFilter::by_artist(artist.id)).await
    }

    pub async fn company_albums(&self, company: &RecordCompany) -> DomainResult<Vec<Album>> {
        self.store.find_albums(AlbumFilter::by_record_company(company.id)).await
    }

    pub async fn company_num_of_albums(&self, company: &RecordCompany) -> DomainResult<u64> {
        self.store.count_albums(AlbumFilter::by_record_company(company.id)).await
    }
}
