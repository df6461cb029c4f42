//! Timestamp parsing for the ISO-8601 variants seen in sensor exports.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an RFC 3339 timestamp, a naive date-time (taken as UTC), or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_common_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01 10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:15:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T11:15:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:15"), Some(expected));
        assert!(parse_timestamp("2024-01-01 10:15:00.250").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
