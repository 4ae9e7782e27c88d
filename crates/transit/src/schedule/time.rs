//! Clock formatting for matrix cells.

use chrono::{DateTime, NaiveDateTime};

/// 12-hour clock with AM/PM marker, e.g. `02:30 PM`
pub const CLOCK_FORMAT: &str = "%I:%M %p";

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Format an upstream timestamp for display.
///
/// Timestamps carrying a UTC offset are shown in that offset (the agency's
/// local time); timestamps without one are shown as written. Returns `None`
/// for anything unparseable.
pub fn format_clock_time(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.format(CLOCK_FORMAT).to_string());
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.format(CLOCK_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_timestamp() {
        assert_eq!(format_clock_time("2024-01-05T14:30:00").as_deref(), Some("02:30 PM"));
        assert_eq!(format_clock_time("2024-01-05T09:05").as_deref(), Some("09:05 AM"));
    }

    #[test]
    fn test_offset_timestamp_keeps_agency_time() {
        assert_eq!(
            format_clock_time("2024-01-05T14:30:00-05:00").as_deref(),
            Some("02:30 PM")
        );
        assert_eq!(
            format_clock_time("2024-07-05T00:12:00-04:00").as_deref(),
            Some("12:12 AM")
        );
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(format_clock_time("2024-01-05T12:00:00").as_deref(), Some("12:00 PM"));
        assert_eq!(format_clock_time("2024-01-06T00:00:00").as_deref(), Some("12:00 AM"));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(format_clock_time(""), None);
        assert_eq!(format_clock_time("14:30"), None);
        assert_eq!(format_clock_time("tomorrow"), None);
    }
}
