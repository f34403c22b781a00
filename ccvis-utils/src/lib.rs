//! Shared utility functions for ccvis crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Format used by the brush readouts, e.g. "01-01-1990".
    pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a date for on-screen labels ("DD-MM-YYYY").
    pub fn format_display(date: &NaiveDate) -> String {
        date.format(DISPLAY_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date as it shows up in open-data CSV exports.
    ///
    /// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, `YYYYMMDD` and a leading
    /// `YYYY-MM-DD` followed by a time component.
    pub fn parse_csv_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        ["%Y-%m-%d", "%d/%m/%Y", "%Y%m%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| s.get(..10).and_then(|head| parse_date(head).ok()))
    }

    /// Milliseconds since the Unix epoch for midnight of `date`.
    pub fn date_to_millis(date: &NaiveDate) -> i64 {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    }

    /// Inverse of [`date_to_millis`], keeping the time of day.
    pub fn millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
        chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
    }

}
