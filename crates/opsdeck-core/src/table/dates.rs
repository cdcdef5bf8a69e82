// ── Date parsing ──
//
// Records carry dates as strings. Sorting and display need real instants,
// and fixtures in the wild use more than one shape. Everything is
// normalised to a naive UTC datetime; anything unrecognised is `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

/// Parse any supported date representation.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Render as `Jan 5, 2024`; unparseable input is returned unchanged.
pub fn display(raw: &str) -> String {
    parse(raw).map_or_else(|| raw.to_owned(), |dt| dt.format("%b %-d, %Y").to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_supported_shapes() {
        assert_eq!(parse("2024-01-05"), Some(day(2024, 1, 5)));
        assert_eq!(parse("Jan 5, 2024"), Some(day(2024, 1, 5)));
        assert_eq!(parse("January 5, 2024"), Some(day(2024, 1, 5)));
        assert_eq!(parse("2024-01-05T00:00:00"), Some(day(2024, 1, 5)));
        assert_eq!(parse("2024-01-05T00:00:00.000Z"), Some(day(2024, 1, 5)));
        assert_eq!(parse("2024-01-05T02:00:00+02:00"), Some(day(2024, 1, 5)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2024-13-40"), None);
    }

    #[test]
    fn displays_short_month() {
        assert_eq!(display("2023-11-09T14:30:00.000Z"), "Nov 9, 2023");
        assert_eq!(display("n/a"), "n/a");
    }
}
