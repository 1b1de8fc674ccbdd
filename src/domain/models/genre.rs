//! Music genre enumeration.

use serde::{Deserialize, Serialize};

/// Genre of an album.
///
/// Stored and cached in its upper-case wire form (`ROCK`, `HIP_HOP`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MusicGenre {
    Pop,
    Rock,
    HipHop,
    Country,
    Jazz,
    Classical,
    Electronic,
    RAndB,
    Indie,
    Alternative,
}

impl MusicGenre {
    pub const ALL: [Self; 10] = [
        Self::Pop,
        Self::Rock,
        Self::HipHop,
        Self::Country,
        Self::Jazz,
        Self::Classical,
        Self::Electronic,
        Self::RAndB,
        Self::Indie,
        Self::Alternative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pop => "POP",
            Self::Rock => "ROCK",
            Self::HipHop => "HIP_HOP",
            Self::Country => "COUNTRY",
            Self::Jazz => "JAZZ",
            Self::Classical => "CLASSICAL",
            Self::Electronic => "ELECTRONIC",
            Self::RAndB => "R_AND_B",
            Self::Indie => "INDIE",
            Self::Alternative => "ALTERNATIVE",
        }
    }

    /// Case-insensitive parse of the wire form.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|genre| genre.as_str() == upper)
    }
}

impl std::fmt::Display for MusicGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
