//! Artist domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A musical artist (solo act or band).
///
/// `albums` is a denormalized back-reference list: it records the ids of the
/// albums whose `artist_id` points here and is maintained by the mutation
/// pipeline, not derived on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Public identifier assigned by the store
    pub id: Uuid,
    pub name: String,
    pub date_formed: NaiveDate,
    /// Member names, in the order they were supplied
    pub members: Vec<String>,
    /// Back-references to this artist's albums
    #[serde(default)]
    pub albums: Vec<Uuid>,
}

/// Validated input for creating an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub date_formed: NaiveDate,
    pub members: Vec<String>,
}

/// Partial update for an artist. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub date_formed: Option<NaiveDate>,
    pub members: Option<Vec<String>>,
}

impl ArtistPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date_formed.is_none() && self.members.is_none()
    }

    /// Apply this patch to an in-memory artist.
    pub fn apply_to(&self, artist: &mut Artist) {
        if let Some(name) = &self.name {
            artist.name.clone_from(name);
        }
        if let Some(date_formed) = self.date_formed {
            artist.date_formed = date_formed;
        }
        if let Some(members) = &self.members {
            artist.members.clone_from(members);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Artist {
        Artist {
            id: Uuid::new_v4(),
            name: "The Beatles".to_string(),
            date_formed: NaiveDate::from_ymd_opt(1960, 8, 1).unwrap(),
            members: vec!["John Lennon".to_string(), "Paul McCartney".to_string()],
            albums: vec![],
        }
    }

    #[test]
    fn test_patch_leaves_unspecified_fields() {
        let mut artist = sample();
        let patch = ArtistPatch { name: Some("Beatles".to_string()), ..Default::default() };
        patch.apply_to(&mut artist);

        assert_eq!(artist.name, "Beatles");
        assert_eq!(artist.members.len(), 2);
        assert_eq!(artist.date_formed, NaiveDate::from_ymd_opt(1960, 8, 1).unwrap());
    }

    #[test]
    fn test_document_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("dateFormed").is_some());
        assert!(json.get("albums").unwrap().as_array().unwrap().is_empty());
        assert!(json.get("_id").is_none());
    }
}
