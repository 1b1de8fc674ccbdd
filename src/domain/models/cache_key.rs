//! Cache key grammar.
//!
//! | Key                          | Shape                |
//! |------------------------------|----------------------|
//! | single entity                | `<type>:<id>`        |
//! | full collection              | bare type name       |
//! | albums by genre              | `<GENRE>`            |
//! | companies by founding year   | `<min>:<max>`        |
//! | artist name search           | lower-cased term     |
//! | songs by artist              | `songs:<artistId>`   |

use uuid::Uuid;

use super::genre::MusicGenre;

/// All variants share one keyspace. A search term spelled like a
/// collection name or a year range renders to that same key; the typed
/// read then fails, is logged, and falls through to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Artist(Uuid),
    Album(Uuid),
    RecordCompany(Uuid),
    Artists,
    Albums,
    RecordCompanies,
    Genre(MusicGenre),
    FoundedYearRange { min: i32, max: i32 },
    ArtistSearch(String),
    SongsByArtist(Uuid),
}

impl CacheKey {
    /// Search keys are normalized to the trimmed, lower-cased term.
    pub fn artist_search(term: &str) -> Self {
        Self::ArtistSearch(term.trim().to_lowercase())
    }

    /// Secondary-index keys are never invalidated by mutations; they expire by TTL only.
    pub fn is_secondary_index(&self) -> bool {
        matches!(
            self,
            Self::Genre(_) | Self::FoundedYearRange { .. } | Self::ArtistSearch(_) | Self::SongsByArtist(_)
        )
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Artist(id) => write!(f, "artist:{id}"),
            Self::Album(id) => write!(f, "album:{id}"),
            Self::RecordCompany(id) => write!(f, "recordCompany:{id}"),
            Self::Artists => f.write_str("artists"),
            Self::Albums => f.write_str("albums"),
            Self::RecordCompanies => f.write_str("recordCompanies"),
            Self::Genre(genre) => f.write_str(genre.as_str()),
            Self::FoundedYearRange { min, max } => write!(f, "{min}:{max}"),
            Self::ArtistSearch(term) => f.write_str(term),
            Self::SongsByArtist(id) => write!(f, "songs:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_grammar() {
        let id = Uuid::parse_str("6f1c2a4e-0d5b-4b8e-9a57-1f2e3d4c5b6a").unwrap();
        assert_eq!(CacheKey::Artist(id).to_string(), format!("artist:{id}"));
        assert_eq!(CacheKey::RecordCompany(id).to_string(), format!("recordCompany:{id}"));
        assert_eq!(CacheKey::RecordCompanies.to_string(), "recordCompanies");
        assert_eq!(CacheKey::Genre(MusicGenre::HipHop).to_string(), "HIP_HOP");
        assert_eq!(CacheKey::FoundedYearRange { min: 1900, max: 1950 }.to_string(), "1900:1950");
        assert_eq!(CacheKey::artist_search("  The BEA ").to_string(), "the bea");
        assert_eq!(CacheKey::SongsByArtist(id).to_string(), format!("songs:{id}"));
    }

    #[test]
    fn test_secondary_index_classification() {
        assert!(CacheKey::Genre(MusicGenre::Rock).is_secondary_index());
        assert!(CacheKey::artist_search("x").is_secondary_index());
        assert!(!CacheKey::Albums.is_secondary_index());
        assert!(!CacheKey::Album(Uuid::nil()).is_secondary_index());
    }
}
