//! SQLite implementation of the CatalogStore.
//!
//! Row-level primitives are free functions over a `SqliteConnection` so the
//! compound writes can run them inside one transaction while the single-step
//! trait methods run them on a pooled connection.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{parse_date, parse_json_list, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Album, AlbumPatch, Artist, ArtistPatch, MusicGenre, NewAlbum, NewArtist, NewRecordCompany,
    RecordCompany, RecordCompanyPatch,
};
use crate::domain::ports::{
    AlbumFilter, ArtistFilter, CascadeOutcome, CatalogStore, ParentCollection, RecordCompanyFilter,
    RelinkOutcome,
};

const ARTIST_COLUMNS: &str = "id, name, date_formed, members, albums";
const RECORD_COMPANY_COLUMNS: &str = "id, name, founded_year, country, albums";
const ALBUM_COLUMNS: &str = "id, title, release_date, genre, songs, artist_id, record_company_id";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parent_not_found(collection: ParentCollection, id: Uuid) -> DomainError {
    match collection {
        ParentCollection::Artists => DomainError::ArtistNotFound(id),
        ParentCollection::RecordCompanies => DomainError::RecordCompanyNotFound(id),
    }
}

fn unresolved(collection: ParentCollection, id: Uuid) -> DomainError {
    let entity = match collection {
        ParentCollection::Artists => "Artist",
        ParentCollection::RecordCompanies => "Record Company",
    };
    DomainError::UnresolvedReference { entity, id }
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

async fn select_artist(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Option<Artist>> {
    let row: Option<ArtistRow> = sqlx::query_as(&format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?"))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(TryInto::try_into).transpose()
}

async fn remove_artist_row(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Artist> {
    let artist = select_artist(conn, id).await?.ok_or(DomainError::ArtistNotFound(id))?;
    sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(artist)
}

// ---------------------------------------------------------------------------
// Record companies
// ---------------------------------------------------------------------------

async fn select_record_company(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Option<RecordCompany>> {
    let row: Option<RecordCompanyRow> =
        sqlx::query_as(&format!("SELECT {RECORD_COMPANY_COLUMNS} FROM record_companies WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

    row.map(TryInto::try_into).transpose()
}

async fn remove_record_company_row(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<RecordCompany> {
    let company = select_record_company(conn, id)
        .await?
        .ok_or(DomainError::RecordCompanyNotFound(id))?;
    sqlx::query("DELETE FROM record_companies WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(company)
}

// ---------------------------------------------------------------------------
// Albums
// ---------------------------------------------------------------------------

fn push_album_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &AlbumFilter) {
    if let Some(artist_id) = filter.artist_id {
        qb.push(" AND artist_id = ").push_bind(artist_id.to_string());
    }
    if let Some(record_company_id) = filter.record_company_id {
        qb.push(" AND record_company_id = ").push_bind(record_company_id.to_string());
    }
    if let Some(genre) = filter.genre {
        qb.push(" AND genre = ").push_bind(genre.as_str());
    }
}

async fn select_album(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Option<Album>> {
    let row: Option<AlbumRow> = sqlx::query_as(&format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?"))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(TryInto::try_into).transpose()
}

async fn select_albums(conn: &mut SqliteConnection, filter: &AlbumFilter) -> DomainResult<Vec<Album>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE 1=1"));
    push_album_filter(&mut qb, filter);
    qb.push(" ORDER BY rowid");

    let rows: Vec<AlbumRow> = qb.build_query_as().fetch_all(&mut *conn).await?;
    rows.into_iter().map(TryInto::try_into).collect()
}

async fn write_new_album(conn: &mut SqliteConnection, album: &NewAlbum) -> DomainResult<Uuid> {
    let id = Uuid::new_v4();
    let songs_json = serde_json::to_string(&album.songs)?;

    let result = sqlx::query(
        r"INSERT INTO albums (id, title, release_date, genre, songs, artist_id, record_company_id)
           VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(&album.title)
    .bind(album.release_date.to_string())
    .bind(album.genre.as_str())
    .bind(&songs_json)
    .bind(album.artist_id.to_string())
    .bind(album.record_company_id.to_string())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::WriteFailed("Could not Add Album".to_string()));
    }
    Ok(id)
}

async fn patch_album(conn: &mut SqliteConnection, id: Uuid, patch: &AlbumPatch) -> DomainResult<Album> {
    let songs_json = patch.songs.as_ref().map(serde_json::to_string).transpose()?;

    let result = sqlx::query(
        r"UPDATE albums SET
               title = COALESCE(?, title),
               release_date = COALESCE(?, release_date),
               genre = COALESCE(?, genre),
               songs = COALESCE(?, songs),
               artist_id = COALESCE(?, artist_id),
               record_company_id = COALESCE(?, record_company_id)
           WHERE id = ?",
    )
    .bind(patch.title.as_deref())
    .bind(patch.release_date.map(|d| d.to_string()))
    .bind(patch.genre.map(|g| g.as_str()))
    .bind(songs_json)
    .bind(patch.artist_id.map(|id| id.to_string()))
    .bind(patch.record_company_id.map(|id| id.to_string()))
    .bind(id.to_string())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::AlbumNotFound(id));
    }
    select_album(conn, id).await?.ok_or(DomainError::AlbumNotFound(id))
}

async fn remove_album_row(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Album> {
    let album = select_album(conn, id).await?.ok_or(DomainError::AlbumNotFound(id))?;
    sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(album)
}

// ---------------------------------------------------------------------------
// Back-references
// ---------------------------------------------------------------------------

/// Append `album_id` to one parent's list. Returns false if the parent is absent.
async fn push_reference_in(
    conn: &mut SqliteConnection,
    collection: ParentCollection,
    parent_id: Uuid,
    album_id: Uuid,
) -> DomainResult<bool> {
    let table = collection.table();
    let row: Option<(String,)> = sqlx::query_as(&format!("SELECT albums FROM {table} WHERE id = ?"))
        .bind(parent_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    let Some((albums_json,)) = row else {
        return Ok(false);
    };

    let mut albums: Vec<Uuid> = parse_json_list(&albums_json)?;
    if !albums.contains(&album_id) {
        albums.push(album_id);
    }

    sqlx::query(&format!("UPDATE {table} SET albums = ? WHERE id = ?"))
        .bind(serde_json::to_string(&albums)?)
        .bind(parent_id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(true)
}

/// Remove `album_id` from every list in `collection`. Returns the parents modified.
async fn pull_reference_in(
    conn: &mut SqliteConnection,
    collection: ParentCollection,
    album_id: Uuid,
) -> DomainResult<Vec<Uuid>> {
    let table = collection.table();
    // Narrow with LIKE, then filter exactly in code.
    let rows: Vec<(String, String)> = sqlx::query_as(&format!("SELECT id, albums FROM {table} WHERE albums LIKE ?"))
        .bind(format!("%{album_id}%"))
        .fetch_all(&mut *conn)
        .await?;

    let mut modified = Vec::new();
    for (parent_id, albums_json) in rows {
        let mut albums: Vec<Uuid> = parse_json_list(&albums_json)?;
        let before = albums.len();
        albums.retain(|id| *id != album_id);
        if albums.len() == before {
            continue;
        }

        sqlx::query(&format!("UPDATE {table} SET albums = ? WHERE id = ?"))
            .bind(serde_json::to_string(&albums)?)
            .bind(&parent_id)
            .execute(&mut *conn)
            .await?;
        modified.push(parse_uuid(&parent_id)?);
    }
    Ok(modified)
}

/// Delete every album matching `filter` and prune them from `other`'s lists.
async fn cascade_albums(
    conn: &mut SqliteConnection,
    filter: &AlbumFilter,
    other: ParentCollection,
) -> DomainResult<(Vec<Album>, Vec<Uuid>)> {
    let albums = select_albums(conn, filter).await?;
    let mut pruned = Vec::new();

    for album in &albums {
        for parent in pull_reference_in(conn, other, album.id).await? {
            if !pruned.contains(&parent) {
                pruned.push(parent);
            }
        }
        sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(album.id.to_string())
            .execute(&mut *conn)
            .await?;
    }

    Ok((albums, pruned))
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn insert_artist(&self, artist: &NewArtist) -> DomainResult<Uuid> {
        let id = Uuid::new_v4();
        let members_json = serde_json::to_string(&artist.members)?;

        let result = sqlx::query(
            "INSERT INTO artists (id, name, date_formed, members, albums) VALUES (?, ?, ?, ?, '[]')",
        )
        .bind(id.to_string())
        .bind(&artist.name)
        .bind(artist.date_formed.to_string())
        .bind(&members_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::WriteFailed("Could not Add Artist".to_string()));
        }
        Ok(id)
    }

    async fn find_artist(&self, id: Uuid) -> DomainResult<Option<Artist>> {
        let mut conn = self.pool.acquire().await?;
        select_artist(&mut conn, id).await
    }

    async fn find_artists(&self, filter: ArtistFilter) -> DomainResult<Vec<Artist>> {
        let rows: Vec<ArtistRow> = sqlx::query_as(&format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        // SQLite's lower() only folds ASCII; match with Unicode case folding
        // so results agree with the lower-cased search cache key.
        let needle = filter.name_contains.map(|term| term.to_lowercase());
        rows.into_iter()
            .filter(|row| needle.as_deref().is_none_or(|n| row.name.to_lowercase().contains(n)))
            .map(TryInto::try_into)
            .collect()
    }

    async fn update_artist(&self, id: Uuid, patch: &ArtistPatch) -> DomainResult<Artist> {
        let members_json = patch.members.as_ref().map(serde_json::to_string).transpose()?;
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r"UPDATE artists SET
                   name = COALESCE(?, name),
                   date_formed = COALESCE(?, date_formed),
                   members = COALESCE(?, members)
               WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.date_formed.map(|d| d.to_string()))
        .bind(members_json)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArtistNotFound(id));
        }
        select_artist(&mut conn, id).await?.ok_or(DomainError::ArtistNotFound(id))
    }

    async fn delete_artist(&self, id: Uuid) -> DomainResult<Artist> {
        let mut tx = self.pool.begin().await?;
        let artist = remove_artist_row(&mut tx, id).await?;
        tx.commit().await?;
        Ok(artist)
    }

    async fn insert_record_company(&self, company: &NewRecordCompany) -> DomainResult<Uuid> {
        let id = Uuid::new_v4();

        let result = sqlx::query(
            "INSERT INTO record_companies (id, name, founded_year, country, albums) VALUES (?, ?, ?, ?, '[]')",
        )
        .bind(id.to_string())
        .bind(&company.name)
        .bind(company.founded_year)
        .bind(&company.country)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::WriteFailed("Could not Add Record Company".to_string()));
        }
        Ok(id)
    }

    async fn find_record_company(&self, id: Uuid) -> DomainResult<Option<RecordCompany>> {
        let mut conn = self.pool.acquire().await?;
        select_record_company(&mut conn, id).await
    }

    async fn find_record_companies(&self, filter: RecordCompanyFilter) -> DomainResult<Vec<RecordCompany>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {RECORD_COMPANY_COLUMNS} FROM record_companies WHERE 1=1"
        ));
        if let Some(min) = filter.founded_min {
            qb.push(" AND founded_year >= ").push_bind(min);
        }
        if let Some(max) = filter.founded_max {
            qb.push(" AND founded_year <= ").push_bind(max);
        }
        qb.push(" ORDER BY rowid");

        let rows: Vec<RecordCompanyRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_record_company(&self, id: Uuid, patch: &RecordCompanyPatch) -> DomainResult<RecordCompany> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r"UPDATE record_companies SET
                   name = COALESCE(?, name),
                   founded_year = COALESCE(?, founded_year),
                   country = COALESCE(?, country)
               WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.founded_year)
        .bind(patch.country.as_deref())
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RecordCompanyNotFound(id));
        }
        select_record_company(&mut conn, id)
            .await?
            .ok_or(DomainError::RecordCompanyNotFound(id))
    }

    async fn delete_record_company(&self, id: Uuid) -> DomainResult<RecordCompany> {
        let mut tx = self.pool.begin().await?;
        let company = remove_record_company_row(&mut tx, id).await?;
        tx.commit().await?;
        Ok(company)
    }

    async fn insert_album(&self, album: &NewAlbum) -> DomainResult<Uuid> {
        let mut conn = self.pool.acquire().await?;
        write_new_album(&mut conn, album).await
    }

    async fn find_album(&self, id: Uuid) -> DomainResult<Option<Album>> {
        let mut conn = self.pool.acquire().await?;
        select_album(&mut conn, id).await
    }

    async fn find_albums(&self, filter: AlbumFilter) -> DomainResult<Vec<Album>> {
        let mut conn = self.pool.acquire().await?;
        select_albums(&mut conn, &filter).await
    }

    async fn count_albums(&self, filter: AlbumFilter) -> DomainResult<u64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM albums WHERE 1=1");
        push_album_filter(&mut qb, &filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn update_album(&self, id: Uuid, patch: &AlbumPatch) -> DomainResult<Album> {
        let mut conn = self.pool.acquire().await?;
        patch_album(&mut conn, id, patch).await
    }

    async fn delete_album(&self, id: Uuid) -> DomainResult<Album> {
        let mut tx = self.pool.begin().await?;
        let album = remove_album_row(&mut tx, id).await?;
        tx.commit().await?;
        Ok(album)
    }

    async fn push_reference(&self, collection: ParentCollection, parent_id: Uuid, album_id: Uuid) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        if !push_reference_in(&mut tx, collection, parent_id, album_id).await? {
            return Err(parent_not_found(collection, parent_id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn pull_reference(&self, collection: ParentCollection, album_id: Uuid) -> DomainResult<u64> {
        let mut tx = self.pool.begin().await?;
        let modified = pull_reference_in(&mut tx, collection, album_id).await?;
        tx.commit().await?;
        Ok(modified.len() as u64)
    }

    async fn insert_linked_album(&self, album: &NewAlbum) -> DomainResult<Album> {
        let mut tx = self.pool.begin().await?;

        let id = write_new_album(&mut tx, album).await?;
        if !push_reference_in(&mut tx, ParentCollection::RecordCompanies, album.record_company_id, id).await? {
            return Err(unresolved(ParentCollection::RecordCompanies, album.record_company_id));
        }
        if !push_reference_in(&mut tx, ParentCollection::Artists, album.artist_id, id).await? {
            return Err(unresolved(ParentCollection::Artists, album.artist_id));
        }

        tx.commit().await?;

        Ok(Album {
            id,
            title: album.title.clone(),
            release_date: album.release_date,
            genre: album.genre,
            songs: album.songs.clone(),
            artist_id: album.artist_id,
            record_company_id: album.record_company_id,
        })
    }

    async fn relink_album(&self, id: Uuid, patch: &AlbumPatch) -> DomainResult<RelinkOutcome> {
        let mut tx = self.pool.begin().await?;

        let previous = select_album(&mut tx, id).await?.ok_or(DomainError::AlbumNotFound(id))?;
        let updated = patch_album(&mut tx, id, patch).await?;
        let outcome = RelinkOutcome { previous, updated };

        if outcome.artist_changed() {
            pull_reference_in(&mut tx, ParentCollection::Artists, id).await?;
            if !push_reference_in(&mut tx, ParentCollection::Artists, outcome.updated.artist_id, id).await? {
                return Err(unresolved(ParentCollection::Artists, outcome.updated.artist_id));
            }
        }
        if outcome.record_company_changed() {
            pull_reference_in(&mut tx, ParentCollection::RecordCompanies, id).await?;
            let company_id = outcome.updated.record_company_id;
            if !push_reference_in(&mut tx, ParentCollection::RecordCompanies, company_id, id).await? {
                return Err(unresolved(ParentCollection::RecordCompanies, company_id));
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }

    async fn delete_linked_album(&self, id: Uuid) -> DomainResult<Album> {
        let mut tx = self.pool.begin().await?;

        let album = remove_album_row(&mut tx, id).await?;
        pull_reference_in(&mut tx, ParentCollection::Artists, id).await?;
        pull_reference_in(&mut tx, ParentCollection::RecordCompanies, id).await?;

        tx.commit().await?;
        Ok(album)
    }

    async fn cascade_delete_artist(&self, id: Uuid) -> DomainResult<CascadeOutcome<Artist>> {
        let mut tx = self.pool.begin().await?;

        let deleted = remove_artist_row(&mut tx, id).await?;
        let (albums, pruned_parents) =
            cascade_albums(&mut tx, &AlbumFilter::by_artist(id), ParentCollection::RecordCompanies).await?;

        tx.commit().await?;
        Ok(CascadeOutcome { deleted, albums, pruned_parents })
    }

    async fn cascade_delete_record_company(&self, id: Uuid) -> DomainResult<CascadeOutcome<RecordCompany>> {
        let mut tx = self.pool.begin().await?;

        let deleted = remove_record_company_row(&mut tx, id).await?;
        let (albums, pruned_parents) =
            cascade_albums(&mut tx, &AlbumFilter::by_record_company(id), ParentCollection::Artists).await?;

        tx.commit().await?;
        Ok(CascadeOutcome { deleted, albums, pruned_parents })
    }
}

#[derive(sqlx::FromRow)]
struct ArtistRow {
    id: String,
    name: String,
    date_formed: String,
    members: String,
    albums: String,
}

impl TryFrom<ArtistRow> for Artist {
    type Error = DomainError;

    fn try_from(row: ArtistRow) -> Result<Self, Self::Error> {
        Ok(Artist {
            id: parse_uuid(&row.id)?,
            name: row.name,
            date_formed: parse_date(&row.date_formed)?,
            members: parse_json_list(&row.members)?,
            albums: parse_json_list(&row.albums)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecordCompanyRow {
    id: String,
    name: String,
    founded_year: i32,
    country: String,
    albums: String,
}

impl TryFrom<RecordCompanyRow> for RecordCompany {
    type Error = DomainError;

    fn try_from(row: RecordCompanyRow) -> Result<Self, Self::Error> {
        Ok(RecordCompany {
            id: parse_uuid(&row.id)?,
            name: row.name,
            founded_year: row.founded_year,
            country: row.country,
            albums: parse_json_list(&row.albums)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AlbumRow {
    id: String,
    title: String,
    release_date: String,
    genre: String,
    songs: String,
    artist_id: String,
    record_company_id: String,
}

impl TryFrom<AlbumRow> for Album {
    type Error = DomainError;

    fn try_from(row: AlbumRow) -> Result<Self, Self::Error> {
        let genre = MusicGenre::from_str(&row.genre)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid genre: {}", row.genre)))?;

        Ok(Album {
            id: parse_uuid(&row.id)?,
            title: row.title,
            release_date: parse_date(&row.release_date)?,
            genre,
            songs: parse_json_list(&row.songs)?,
            artist_id: parse_uuid(&row.artist_id)?,
            record_company_id: parse_uuid(&row.record_company_id)?,
        })
    }
}
