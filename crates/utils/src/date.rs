//! Date formatting for tables and reports (`dd/mm/yyyy`, es-PE/es-ES style).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const NOT_AVAILABLE: &str = "N/A";
pub const INVALID_DATE: &str = "Fecha inválida";

/// Parses the date shapes the backend emits: RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS(.fff)` and plain `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// `None`/empty renders as `N/A`, unparseable input as `Fecha inválida`.
pub fn format_date(input: Option<&str>) -> String {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date.format("%d/%m/%Y").to_string(),
            None => INVALID_DATE.to_string(),
        },
    }
}

/// Timestamp shown in report headers, e.g. `05/03/2024, 14:02:09`.
pub fn format_timestamp<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// `YYYY-MM-DD`, used in exported file names.
pub fn iso_date<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("not-a-date")), "Fecha inválida");
        assert_eq!(format_date(Some("2024-03-05T00:00:00Z")), "05/03/2024");
        assert_eq!(format_date(Some("2024-03-05 10:11:12")), "05/03/2024");
        assert_eq!(format_date(Some("2024-03-05T10:11:12.000000Z")), "05/03/2024");
        assert_eq!(format_date(Some("2024-12-31")), "31/12/2024");
    }

    #[test]
    fn test_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 2, 9).unwrap();
        assert_eq!(format_timestamp(&at), "05/03/2024, 14:02:09");
        assert_eq!(iso_date(&at), "2024-03-05");
    }
}
