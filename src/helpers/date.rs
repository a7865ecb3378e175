//! Date helper functions

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Resolve a configured timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    match name.trim() {
        "" => Tz::UTC,
        name => name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using UTC", name);
            Tz::UTC
        }),
    }
}

/// Long form used on article pages, e.g. "Mon Jan 15 2024"
pub fn to_date_string(date: &DateTime<Utc>, tz: Tz) -> String {
    date.with_timezone(&tz).format("%a %b %d %Y").to_string()
}

/// Short numeric form used on cards, e.g. "1/15/2024"
pub fn locale_date(date: &DateTime<Utc>, tz: Tz) -> String {
    date.with_timezone(&tz).format("%-m/%-d/%Y").to_string()
}

/// Format a date in ISO 8601 for `<time datetime>`
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_date_string() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(to_date_string(&date, Tz::UTC), "Fri Jan 05 2024");
    }

    #[test]
    fn test_locale_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(locale_date(&date, Tz::UTC), "1/15/2024");
    }

    #[test]
    fn test_timezone_shifts_day() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let tz = parse_timezone("Asia/Kolkata");
        assert_eq!(locale_date(&date, tz), "3/10/2024");
        assert_eq!(to_date_string(&date, tz), "Sun Mar 10 2024");
    }

    #[test]
    fn test_unknown_timezone_is_utc() {
        assert_eq!(parse_timezone("Mars/Olympus"), Tz::UTC);
        assert_eq!(parse_timezone(""), Tz::UTC);
    }

    #[test]
    fn test_date_xml() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(date_xml(&date), "2024-01-15T10:30:00+00:00");
    }
}
