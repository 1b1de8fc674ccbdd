//! Common test utilities for integration tests
//!
//! Builds an in-memory catalog and seeds it with a small, known data set.

#![allow(dead_code)]

use std::sync::Arc;

use music_catalog::adapters::cache::MokaCatalogCache;
use music_catalog::adapters::sqlite::{create_migrated_test_pool, SqliteCatalogStore};
use music_catalog::services::{AddAlbumInput, AddArtistInput, AddCompanyInput};
use music_catalog::{Album, Artist, CatalogContext, Config, RecordCompany};

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A fresh catalog over an in-memory database and an empty cache.
pub async fn catalog() -> CatalogContext {
    catalog_with(Config::default()).await
}

pub async fn catalog_with(config: Config) -> CatalogContext {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let store = Arc::new(SqliteCatalogStore::new(pool));
    let cache = Arc::new(MokaCatalogCache::from_config(&config.cache));
    CatalogContext::from_parts(store, cache, &config)
}

pub async fn add_artist(ctx: &CatalogContext, name: &str, date_formed: &str, members: &[&str]) -> Artist {
    ctx.pipeline
        .add_artist(AddArtistInput {
            name: name.to_string(),
            date_formed: date_formed.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        })
        .await
        .expect("Failed to add artist")
}

pub async fn add_company(ctx: &CatalogContext, name: &str, founded_year: i32, country: &str) -> RecordCompany {
    ctx.pipeline
        .add_company(AddCompanyInput {
            name: name.to_string(),
            founded_year,
            country: country.to_string(),
        })
        .await
        .expect("Failed to add record company")
}

pub fn album_input(
    title: &str,
    release_date: &str,
    genre: &str,
    songs: &[&str],
    artist: &Artist,
    company: &RecordCompany,
) -> AddAlbumInput {
    AddAlbumInput {
        title: title.to_string(),
        release_date: release_date.to_string(),
        genre: genre.to_string(),
        songs: songs.iter().map(|s| s.to_string()).collect(),
        artist_id: artist.id.to_string(),
        record_company_id: company.id.to_string(),
    }
}

/// The Beatles on Parlophone with two albums, and Queen on EMI with none.
pub struct Seed {
    pub beatles: Artist,
    pub queen: Artist,
    pub parlophone: RecordCompany,
    pub emi: RecordCompany,
    pub abbey_road: Album,
    pub revolver: Album,
}

pub async fn seed(ctx: &CatalogContext) -> Seed {
    let beatles = add_artist(
        ctx,
        "The Beatles",
        "08/01/1960",
        &["John Lennon", "Paul McCartney", "George Harrison", "Ringo Starr"],
    )
    .await;
    let queen = add_artist(ctx, "Queen", "6/27/1970", &["Freddie Mercury", "Brian May"]).await;
    let parlophone = add_company(ctx, "Parlophone", 1923, "United Kingdom").await;
    let emi = add_company(ctx, "EMI", 1931, "United Kingdom").await;

    let abbey_road = ctx
        .pipeline
        .add_album(album_input(
            "Abbey Road",
            "9/26/1969",
            "rock",
            &["Come Together", "Something"],
            &beatles,
            &parlophone,
        ))
        .await
        .expect("Failed to add album");
    let revolver = ctx
        .pipeline
        .add_album(album_input(
            "Revolver",
            "8/5/1966",
            "POP",
            &["Taxman", "Eleanor Rigby"],
            &beatles,
            &parlophone,
        ))
        .await
        .expect("Failed to add album");

    Seed { beatles, queen, parlophone, emi, abbey_road, revolver }
}
