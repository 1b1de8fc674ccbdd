//! Field-level input validation.
//!
//! Every check trims its input and fails with [`DomainError::ValidationFailed`]
//! naming the offending field. Validators never touch the store or the cache.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use uuid::Uuid;

use super::errors::{DomainError, DomainResult};
use super::models::{MusicGenre, MAX_FOUNDED_YEAR, MIN_FOUNDED_YEAR};

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name pattern"));

// MM/DD/YYYY with optional zero padding on month and day.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid date pattern"));

/// Non-empty after trimming.
pub fn check_string(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(field));
    }
    Ok(trimmed.to_string())
}

/// Letters and whitespace only.
pub fn check_name(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !NAME_PATTERN.is_match(trimmed) {
        return Err(DomainError::invalid(field));
    }
    Ok(trimmed.to_string())
}

/// `MM/DD/YYYY`, `MM/D/YYYY`, `M/DD/YYYY` or `M/D/YYYY`, and a real calendar day.
pub fn check_date(value: &str, field: &str) -> DomainResult<NaiveDate> {
    let trimmed = value.trim();
    let caps = DATE_PATTERN
        .captures(trimmed)
        .ok_or_else(|| DomainError::invalid(field))?;

    let month: u32 = caps[1].parse().map_err(|_| DomainError::invalid(field))?;
    let day: u32 = caps[2].parse().map_err(|_| DomainError::invalid(field))?;
    let year: i32 = caps[3].parse().map_err(|_| DomainError::invalid(field))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DomainError::invalid(field))
}

/// Parse a public entity id.
pub fn check_id(value: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| DomainError::ValidationFailed(format!("Invalid id: {}", value.trim())))
}

pub fn check_genre(value: &str) -> DomainResult<MusicGenre> {
    MusicGenre::from_str(value).ok_or_else(|| DomainError::invalid("Genre"))
}

pub fn check_founded_year(year: i32) -> DomainResult<i32> {
    if !(MIN_FOUNDED_YEAR..=MAX_FOUNDED_YEAR).contains(&year) {
        return Err(DomainError::ValidationFailed("Invalid founded year".to_string()));
    }
    Ok(year)
}

/// Formation dates must fall between 1900 and today.
pub fn check_formation_date(date: NaiveDate) -> DomainResult<NaiveDate> {
    if date.year() < MIN_FOUNDED_YEAR || date > Utc::now().date_naive() {
        return Err(DomainError::ValidationFailed("Date is invalid".to_string()));
    }
    Ok(date)
}

/// A non-empty list whose every element passes `check`.
pub fn check_list<F>(values: &[String], field: &str, check: F) -> DomainResult<Vec<String>>
where
    F: Fn(&str, &str) -> DomainResult<String>,
{
    if values.is_empty() {
        return Err(DomainError::ValidationFailed(format!("{field} list cannot be empty")));
    }
    values.iter().map(|v| check(v, field)).collect()
}

/// `1900 <= min <= max <= 2024`.
pub fn check_year_range(min: i32, max: i32) -> DomainResult<(i32, i32)> {
    if min < MIN_FOUNDED_YEAR || max > MAX_FOUNDED_YEAR || min > max {
        return Err(DomainError::ValidationFailed("Invalid Date Range".to_string()));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_string_trims() {
        assert_eq!(check_string("  Abbey Road ", "Title").unwrap(), "Abbey Road");
        assert!(check_string("   ", "Title").is_err());
    }

    #[test]
    fn test_check_name_rejects_digits() {
        assert_eq!(check_name(" John Lennon ", "Member Name").unwrap(), "John Lennon");
        assert!(check_name("R2D2", "Member Name").is_err());
        assert!(check_name("", "Member Name").is_err());
    }

    #[test]
    fn test_check_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1969, 9, 6).unwrap();
        assert_eq!(check_date("09/06/1969", "Release Date").unwrap(), expected);
        assert_eq!(check_date("9/06/1969", "Release Date").unwrap(), expected);
        assert_eq!(check_date("09/6/1969", "Release Date").unwrap(), expected);
        assert_eq!(check_date("9/6/1969", "Release Date").unwrap(), expected);
    }

    #[test]
    fn test_check_date_rejects_bad_input() {
        assert!(check_date("1969-09-06", "Release Date").is_err());
        assert!(check_date("02/30/2001", "Release Date").is_err());
        assert!(check_date("13/01/2001", "Release Date").is_err());
        assert!(check_date("1/1/01", "Release Date").is_err());
    }

    #[test]
    fn test_year_range() {
        assert!(check_year_range(1900, 2024).is_ok());
        assert!(check_year_range(1950, 1950).is_ok());
        assert!(check_year_range(2030, 1900).is_err());
        assert!(check_year_range(1899, 1950).is_err());
        assert!(check_year_range(1950, 2025).is_err());
    }

    #[test]
    fn test_check_list() {
        let members = vec!["Ringo Starr".to_string(), " George Harrison".to_string()];
        let checked = check_list(&members, "Member Name", check_name).unwrap();
        assert_eq!(checked, vec!["Ringo Starr", "George Harrison"]);

        assert!(check_list(&[], "Member Name", check_name).is_err());
        assert!(check_list(&["ok".to_string(), "4".to_string()], "Member Name", check_name).is_err());
    }

    #[test]
    fn test_formation_date_bounds() {
        assert!(check_formation_date(NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()).is_err());
        assert!(check_formation_date(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()).is_ok());
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        assert!(check_formation_date(tomorrow).is_err());
    }
}
