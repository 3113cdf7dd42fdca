//! Display-date helpers.
//!
//! Entities carry a `dd/mm/yyyy` display date derived from store
//! timestamps. List sorting parses that literal format back into a
//! [`NaiveDate`]; a value that does not parse yields `None`, which orders
//! before every real date.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// `strftime` pattern of display dates.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Format a store timestamp as a display date.
#[must_use]
pub fn format_display(ts: DateTime<Utc>) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Parse a `dd/mm/yyyy` display date.
#[must_use]
pub fn parse_display(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DISPLAY_FORMAT).ok()
}

/// Whether a display date falls in the given calendar month.
#[must_use]
pub fn in_month(value: &str, year: i32, month: u32) -> bool {
    parse_display(value).is_some_and(|date| date.year() == year && date.month() == month)
}

/// Wall-clock `HH:MM` stamp used on chat messages.
#[must_use]
pub fn clock_time() -> String {
    Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_day_first() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 8, 14, 30, 0).unwrap();
        assert_eq!(format_display(ts), "08/05/2025");
    }

    #[test]
    fn parses_display_dates() {
        assert_eq!(parse_display("12/05/2025"), NaiveDate::from_ymd_opt(2025, 5, 12));
        assert_eq!(parse_display(" 01/01/2024 "), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_display("2025-05-12"), None);
        assert_eq!(parse_display("31/02/2025"), None);
        assert_eq!(parse_display(""), None);
    }

    #[test]
    fn month_membership() {
        assert!(in_month("15/03/2026", 2026, 3));
        assert!(!in_month("15/03/2026", 2025, 3));
        assert!(!in_month("garbage", 2026, 3));
    }

    #[test]
    fn format_then_parse_is_identity_on_dates() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(parse_display(&format_display(ts)), Some(ts.date_naive()));
    }
}
