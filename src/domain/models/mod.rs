pub mod album;
pub mod artist;
pub mod cache_key;
pub mod config;
pub mod genre;
pub mod record_company;

pub use album::{Album, AlbumPatch, NewAlbum};
pub use artist::{Artist, ArtistPatch, NewArtist};
pub use cache_key::CacheKey;
pub use config::{CacheConfig, Config, DatabaseConfig, LoggingConfig};
pub use genre::MusicGenre;
pub use record_company::{
    NewRecordCompany, RecordCompany, RecordCompanyPatch, MAX_FOUNDED_YEAR, MIN_FOUNDED_YEAR,
};
