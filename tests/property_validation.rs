use music_catalog::domain::validation::{check_date, check_name, check_string, check_year_range};
use music_catalog::CacheKey;
use proptest::prelude::*;

proptest! {
    /// Property: names made of letters and inner spaces are accepted and trimmed
    #[test]
    fn prop_letter_names_accepted(name in "[a-zA-Z]{1,12}( [a-zA-Z]{1,12}){0,3}", pad in " {0,3}") {
        let padded = format!("{pad}{name}{pad}");
        let checked = check_name(&padded, "Name").unwrap();
        prop_assert_eq!(checked, name);
    }

    /// Property: any digit anywhere in a name is rejected
    #[test]
    fn prop_names_with_digits_rejected(prefix in "[a-zA-Z]{0,6}", digit in "[0-9]", suffix in "[a-zA-Z]{0,6}") {
        let name = format!("{prefix}{digit}{suffix}");
        prop_assert!(check_name(&name, "Name").is_err());
    }

    /// Property: blank strings never pass
    #[test]
    fn prop_blank_strings_rejected(blank in "[ \t]{0,8}") {
        prop_assert!(check_string(&blank, "Title").is_err());
    }

    /// Property: every real calendar day parses, padded or not
    #[test]
    fn prop_valid_dates_parse(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
        let unpadded = format!("{month}/{day}/{year}");
        let padded = format!("{month:02}/{day:02}/{year}");
        let a = check_date(&unpadded, "Release Date").unwrap();
        let b = check_date(&padded, "Release Date").unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: a year range is accepted exactly when 1900 <= min <= max <= 2024
    #[test]
    fn prop_year_range_bounds(min in 1850i32..2075, max in 1850i32..2075) {
        let expected = (1900..=2024).contains(&min) && (1900..=2024).contains(&max) && min <= max;
        prop_assert_eq!(check_year_range(min, max).is_ok(), expected);
    }

    /// Property: search keys ignore case and surrounding whitespace
    #[test]
    fn prop_search_key_normalized(term in "[a-zA-Z ]{1,16}") {
        let key = CacheKey::artist_search(&term);
        prop_assert_eq!(key.clone(), CacheKey::artist_search(&term.to_uppercase()));
        prop_assert_eq!(key.to_string(), term.trim().to_lowercase());
    }
}
