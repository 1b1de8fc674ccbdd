use clap::Parser;
use music_catalog::cli::commands::album::AlbumCommands;
use music_catalog::cli::commands::cache::CacheCommands;
use music_catalog::cli::commands::company::CompanyCommands;
use music_catalog::cli::{Cli, Commands};

#[test]
fn test_parse_album_add() {
    let cli = Cli::try_parse_from(vec![
        "music-catalog",
        "album",
        "add",
        "--title",
        "Abbey Road",
        "--release-date",
        "9/26/1969",
        "--genre",
        "rock",
        "--song",
        "Come Together",
        "--song",
        "Something",
        "--artist",
        "550e8400-e29b-41d4-a716-446655440000",
        "--company",
        "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
    ])
    .unwrap();

    match cli.command {
        Commands::Album(args) => match args.command {
            AlbumCommands::Add { title, songs, genre, .. } => {
                assert_eq!(title, "Abbey Road");
                assert_eq!(genre, "rock");
                assert_eq!(songs, vec!["Come Together", "Something"]);
            }
            _ => panic!("Wrong album command"),
        },
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
}

#[test]
fn test_parse_album_edit_leaves_unset_fields_empty() {
    let cli = Cli::try_parse_from(vec!["music-catalog", "album", "edit", "some-id", "--genre", "JAZZ"]).unwrap();

    match cli.command {
        Commands::Album(args) => match args.command {
            AlbumCommands::Edit { id, title, genre, songs, artist, company, release_date } => {
                assert_eq!(id, "some-id");
                assert_eq!(genre.as_deref(), Some("JAZZ"));
                assert!(title.is_none());
                assert!(songs.is_empty());
                assert!(artist.is_none());
                assert!(company.is_none());
                assert!(release_date.is_none());
            }
            _ => panic!("Wrong album command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_company_founded_with_global_json() {
    let cli = Cli::try_parse_from(vec!["music-catalog", "company", "founded", "1900", "1950", "--json"]).unwrap();
    assert!(cli.json);

    match cli.command {
        Commands::Company(args) => match args.command {
            CompanyCommands::Founded { min, max } => {
                assert_eq!(min, 1900);
                assert_eq!(max, 1950);
            }
            _ => panic!("Wrong company command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_cache_flush() {
    let cli = Cli::try_parse_from(vec!["music-catalog", "-j", "cache", "flush"]).unwrap();
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Cache(ref args) if matches!(args.command, CacheCommands::Flush)));
}

#[test]
fn test_company_founded_year_must_be_numeric() {
    let result = Cli::try_parse_from(vec![
        "music-catalog",
        "company",
        "add",
        "--name",
        "Motown",
        "--founded-year",
        "nineteen",
        "--country",
        "United States",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
