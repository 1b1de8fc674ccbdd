//! Record company domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Earliest founding year a record company may carry.
pub const MIN_FOUNDED_YEAR: i32 = 1900;

/// Latest founding year a record company may carry.
pub const MAX_FOUNDED_YEAR: i32 = 2024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCompany {
    pub id: Uuid,
    pub name: String,
    pub founded_year: i32,
    pub country: String,
    /// Back-references to albums released under this company
    #[serde(default)]
    pub albums: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecordCompany {
    pub name: String,
    pub founded_year: i32,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCompanyPatch {
    pub name: Option<String>,
    pub founded_year: Option<i32>,
    pub country: Option<String>,
}

impl RecordCompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.founded_year.is_none() && self.country.is_none()
    }

    pub fn apply_to(&self, company: &mut RecordCompany) {
        if let Some(name) = &self.name {
            company.name.clone_from(name);
        }
        if let Some(founded_year) = self.founded_year {
            company.founded_year = founded_year;
        }
        if let Some(country) = &self.country {
            company.country.clone_from(country);
        }
    }
}
