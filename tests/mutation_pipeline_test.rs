//! Write-side behaviour: validation, referential checks, back-references,
//! cascades and cache invalidation.

mod common;

use music_catalog::services::{AddArtistInput, AddCompanyInput, EditAlbumInput, EditArtistInput, EditCompanyInput};
use music_catalog::{CacheKey, CatalogCache, CatalogStore, Config, ErrorKind};
use uuid::Uuid;

use common::{add_artist, add_company, album_input, catalog, catalog_with, seed};

#[tokio::test]
async fn test_add_artist_trims_and_caches() {
    let ctx = catalog().await;
    let artist = add_artist(&ctx, "  Pink Floyd ", "1/1/1965", &[" Syd Barrett", "Roger Waters "]).await;

    assert_eq!(artist.name, "Pink Floyd");
    assert_eq!(artist.members, vec!["Syd Barrett", "Roger Waters"]);
    assert!(artist.albums.is_empty());

    let key = CacheKey::Artist(artist.id).to_string();
    assert!(ctx.cache.cache().exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_validation_rejects_before_store_access() {
    let ctx = catalog().await;

    let err = ctx
        .pipeline
        .add_artist(AddArtistInput {
            name: "Queen".to_string(),
            date_formed: "1970-06-27".to_string(),
            members: vec!["Freddie Mercury".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);

    let err = ctx
        .pipeline
        .add_artist(AddArtistInput {
            name: "Queen".to_string(),
            date_formed: "6/27/1970".to_string(),
            members: vec!["Brian May".to_string(), "R2D2".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);

    let err = ctx
        .pipeline
        .add_company(AddCompanyInput {
            name: "Island".to_string(),
            founded_year: 1899,
            country: "Jamaica".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);

    assert!(ctx.resolver.artists().await.unwrap().is_empty());
    assert!(ctx.resolver.record_companies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_album_maintains_back_references() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    let artist = ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();
    assert_eq!(artist.albums, vec![seed.abbey_road.id, seed.revolver.id]);

    let company = ctx
        .resolver
        .get_company_by_id(&seed.parlophone.id.to_string())
        .await
        .unwrap();
    assert_eq!(company.albums, vec![seed.abbey_road.id, seed.revolver.id]);
}

#[tokio::test]
async fn test_album_cannot_predate_artist() {
    let ctx = catalog().await;
    let artist = add_artist(&ctx, "Eurythmics", "1/1/1980", &["Annie Lennox"]).await;
    let company = add_company(&ctx, "RCA", 1929, "United States").await;

    let err = ctx
        .pipeline
        .add_album(album_input("Early Demos", "1/1/1950", "POP", &["Demo"], &artist, &company))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
    assert_eq!(err.to_string(), "Release date cannot be before the artist was formed");
}

#[tokio::test]
async fn test_unresolved_reference_is_internal() {
    let ctx = catalog().await;
    let artist = add_artist(&ctx, "Blondie", "1/1/1974", &["Debbie Harry"]).await;
    let mut input = album_input(
        "Parallel Lines",
        "9/23/1978",
        "ROCK",
        &["Heart of Glass"],
        &artist,
        &add_company(&ctx, "Chrysalis", 1968, "United Kingdom").await,
    );
    input.record_company_id = Uuid::new_v4().to_string();

    let err = ctx.pipeline.add_album(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");

    let artist = ctx.resolver.get_artist_by_id(&artist.id.to_string()).await.unwrap();
    assert!(artist.albums.is_empty());
}

#[tokio::test]
async fn test_edit_album_is_visible_in_next_read() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    // Warm the collection and single keys first.
    ctx.resolver.albums().await.unwrap();
    ctx.resolver.get_album_by_id(&seed.revolver.id.to_string()).await.unwrap();

    let edited = ctx
        .pipeline
        .edit_album(EditAlbumInput {
            id: seed.revolver.id.to_string(),
            title: Some("Revolver (Remastered)".to_string()),
            ..EditAlbumInput::default()
        })
        .await
        .unwrap();
    assert_eq!(edited.title, "Revolver (Remastered)");
    assert_eq!(edited.songs, seed.revolver.songs);

    let albums = ctx.resolver.albums().await.unwrap();
    assert!(albums.iter().any(|a| a.title == "Revolver (Remastered)"));

    let single = ctx.resolver.get_album_by_id(&seed.revolver.id.to_string()).await.unwrap();
    assert_eq!(single.title, "Revolver (Remastered)");
}

#[tokio::test]
async fn test_edit_album_moves_back_references() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    ctx.resolver.get_company_by_id(&seed.emi.id.to_string()).await.unwrap();

    ctx.pipeline
        .edit_album(EditAlbumInput {
            id: seed.abbey_road.id.to_string(),
            record_company_id: Some(seed.emi.id.to_string()),
            ..EditAlbumInput::default()
        })
        .await
        .unwrap();

    let emi = ctx.resolver.get_company_by_id(&seed.emi.id.to_string()).await.unwrap();
    assert_eq!(emi.albums, vec![seed.abbey_road.id]);

    let parlophone = ctx
        .resolver
        .get_company_by_id(&seed.parlophone.id.to_string())
        .await
        .unwrap();
    assert_eq!(parlophone.albums, vec![seed.revolver.id]);
}

#[tokio::test]
async fn test_edit_album_checks_effective_release_date() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    // Queen formed in 1970; Revolver came out in 1966.
    let err = ctx
        .pipeline
        .edit_album(EditAlbumInput {
            id: seed.revolver.id.to_string(),
            artist_id: Some(seed.queen.id.to_string()),
            ..EditAlbumInput::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
}

#[tokio::test]
async fn test_empty_edit_returns_current_entity() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    let artist = ctx
        .pipeline
        .edit_artist(EditArtistInput { id: seed.queen.id.to_string(), ..EditArtistInput::default() })
        .await
        .unwrap();
    assert_eq!(artist, seed.queen);

    let err = ctx
        .pipeline
        .edit_company(EditCompanyInput { id: Uuid::new_v4().to_string(), ..EditCompanyInput::default() })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_edit_company_refreshes_collection() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;
    ctx.resolver.record_companies().await.unwrap();

    ctx.pipeline
        .edit_company(EditCompanyInput {
            id: seed.emi.id.to_string(),
            country: Some("England".to_string()),
            ..EditCompanyInput::default()
        })
        .await
        .unwrap();

    let companies = ctx.resolver.record_companies().await.unwrap();
    let emi = companies.iter().find(|c| c.id == seed.emi.id).unwrap();
    assert_eq!(emi.country, "England");
}

#[tokio::test]
async fn test_remove_album_pulls_back_references() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;
    ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();

    let removed = ctx.pipeline.remove_album(&seed.abbey_road.id.to_string()).await.unwrap();
    assert_eq!(removed.id, seed.abbey_road.id);

    let artist = ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();
    assert_eq!(artist.albums, vec![seed.revolver.id]);

    let err = ctx
        .resolver
        .get_album_by_id(&seed.abbey_road.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_remove_artist_cascades_to_albums() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    ctx.resolver.albums().await.unwrap();
    ctx.resolver.get_company_by_id(&seed.parlophone.id.to_string()).await.unwrap();

    let removed = ctx.pipeline.remove_artist(&seed.beatles.id.to_string()).await.unwrap();
    assert_eq!(removed.id, seed.beatles.id);

    assert!(ctx.resolver.albums().await.unwrap().is_empty());
    assert_eq!(ctx.store.count_albums(Default::default()).await.unwrap(), 0);

    let parlophone = ctx
        .resolver
        .get_company_by_id(&seed.parlophone.id.to_string())
        .await
        .unwrap();
    assert!(parlophone.albums.is_empty());

    let err = ctx
        .resolver
        .get_artist_by_id(&seed.beatles.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_remove_company_cascades_and_flushes() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    ctx.resolver.artists().await.unwrap();
    ctx.resolver.albums_by_genre("ROCK").await.unwrap();

    ctx.pipeline.remove_company(&seed.parlophone.id.to_string()).await.unwrap();

    let genre_key = CacheKey::Genre(music_catalog::MusicGenre::Rock).to_string();
    assert!(!ctx.cache.cache().exists(&genre_key).await.unwrap());

    let beatles = ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();
    assert!(beatles.albums.is_empty());
    assert!(ctx.resolver.albums().await.unwrap().is_empty());
    assert_eq!(ctx.resolver.record_companies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_unknown_artist_is_not_found() {
    let ctx = catalog().await;
    let err = ctx.pipeline.remove_artist(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ctx.pipeline.remove_album("42").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadInput);
}

#[tokio::test]
async fn test_catalog_works_with_cache_down() {
    let mut config = Config::default();
    config.cache.reconnect_attempts = 0;
    let ctx = catalog_with(config).await;
    ctx.cache.cache().disconnect().await.unwrap();

    let seed = seed(&ctx).await;

    let artist = ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();
    assert_eq!(artist.albums.len(), 2);

    let songs = ctx
        .resolver
        .get_songs_by_artist_id(&seed.beatles.id.to_string())
        .await
        .unwrap();
    assert_eq!(songs.len(), 4);
    assert!(!ctx.cache.cache().is_connected());
}

#[tokio::test]
async fn test_secondary_indexes_wait_for_ttl() {
    let ctx = catalog().await;
    let seed = seed(&ctx).await;

    let rock = ctx.resolver.albums_by_genre("ROCK").await.unwrap();
    assert_eq!(rock.len(), 1);
    let songs = ctx
        .resolver
        .get_songs_by_artist_id(&seed.beatles.id.to_string())
        .await
        .unwrap();

    let let_it_be = ctx
        .pipeline
        .add_album(album_input(
            "Let It Be",
            "5/8/1970",
            "ROCK",
            &["Get Back"],
            &seed.beatles,
            &seed.parlophone,
        ))
        .await
        .unwrap();

    // Index keys keep serving the pre-write answer until they expire.
    assert_eq!(ctx.resolver.albums_by_genre("rock").await.unwrap().len(), 1);
    let cached_songs = ctx
        .resolver
        .get_songs_by_artist_id(&seed.beatles.id.to_string())
        .await
        .unwrap();
    assert_eq!(cached_songs, songs);

    // Collections and single documents reflect the write immediately.
    let albums = ctx.resolver.albums().await.unwrap();
    assert_eq!(albums.len(), 3);
    assert!(albums.iter().any(|a| a.id == let_it_be.id));
    let beatles = ctx.resolver.get_artist_by_id(&seed.beatles.id.to_string()).await.unwrap();
    assert!(beatles.albums.contains(&let_it_be.id));
}

#[tokio::test]
async fn test_secondary_indexes_refresh_after_ttl() {
    let mut config = Config::default();
    config.cache.ttl_secs = 1;
    let ctx = catalog_with(config).await;
    let seed = seed(&ctx).await;

    assert_eq!(ctx.resolver.albums_by_genre("ROCK").await.unwrap().len(), 1);
    ctx.pipeline
        .add_album(album_input("Let It Be", "5/8/1970", "ROCK", &["Get Back"], &seed.beatles, &seed.parlophone))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
    assert_eq!(ctx.resolver.albums_by_genre("ROCK").await.unwrap().len(), 2);
}
