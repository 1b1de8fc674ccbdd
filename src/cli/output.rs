//! Output formatting utilities for the CLI.

use chrono::NaiveDate;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Dates are shown in the same `M/D/YYYY` form they are entered in.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Render the table to string with a count header.
pub fn render_list(singular: &str, plural: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {plural} found.");
    }
    let noun = if total == 1 { singular } else { plural };
    format!("{total} {noun}:\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Abbey Road", 20), "Abbey Road");
        assert_eq!(truncate("Sgt. Pepper's Lonely Hearts Club Band", 12), "Sgt. Pepp...");
    }

    #[test]
    fn test_format_date_unpadded() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(1969, 9, 6).unwrap()), "9/6/1969");
    }

    #[test]
    fn test_render_list_counts() {
        let mut table = list_table(&["id", "name"]);
        assert_eq!(render_list("artist", "artists", &table, 0), "No artists found.");

        table.add_row(vec!["1", "Queen"]);
        let rendered = render_list("artist", "artists", &table, 1);
        assert!(rendered.starts_with("1 artist:"));
        assert!(rendered.contains("NAME"));
        assert!(rendered.contains("Queen"));
    }
}
