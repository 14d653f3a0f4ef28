//! Date normalization between the front end and the datastore.
//!
//! The valuations table stores dates as `YYYY-MM-DD` text. Inputs that parse
//! in that format are re-emitted canonically; anything else is passed through
//! trimmed, so a front end sending pre-formatted text still binds verbatim.

use chrono::NaiveDate;

pub const DB_DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a front-end date for binding against the `date` column.
pub fn normalize_for_db(input: &str) -> String {
    let trimmed = input.trim();
    match NaiveDate::parse_from_str(trimmed, DB_DATE_FORMAT) {
        Ok(d) => d.format(DB_DATE_FORMAT).to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Render a stored date using the configured display format.
///
/// Values that are not `YYYY-MM-DD` are returned unchanged.
pub fn format_for_output(value: &str, display_format: &str) -> String {
    let trimmed = value.trim();
    match NaiveDate::parse_from_str(trimmed, DB_DATE_FORMAT) {
        Ok(d) => d.format(display_format).to_string(),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_date() {
        assert_eq!(normalize_for_db(" 2024-01-02 "), "2024-01-02");
        assert_eq!(normalize_for_db("2024-1-2"), "2024-01-02");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_for_db("02/01/2024"), "02/01/2024");
        assert_eq!(normalize_for_db("not-a-date"), "not-a-date");
    }

    #[test]
    fn test_format_for_output() {
        assert_eq!(format_for_output("2024-01-02", "%d/%m/%Y"), "02/01/2024");
        assert_eq!(format_for_output("2024-01-02", "%Y-%m-%d"), "2024-01-02");
        assert_eq!(format_for_output("garbage", "%d/%m/%Y"), "garbage");
    }
}
