use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// `PnYnMnDTnHnMnS` (each component optional, in order) or `PnW`. A decimal fraction
/// (`.` or `,`) is only allowed on the component that ends the string.
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(?:([0-9]+Y|[0-9]+[.,][0-9]+Y$)?([0-9]+M|[0-9]+[.,][0-9]+M$)?([0-9]+D|[0-9]+[.,][0-9]+D$)?(T([0-9]+H|[0-9]+[.,][0-9]+H$)?([0-9]+M|[0-9]+[.,][0-9]+M$)?([0-9]+S|[0-9]+[.,][0-9]+S$)?)?)|[0-9]+(?:[.,][0-9]+)?W)$",
    )
    .expect("duration pattern is valid")
});

/// A bare `P` is rejected; a bare `PT` is accepted.
#[must_use]
pub fn is_iso8601_duration(raw: &str) -> bool {
    raw != "P" && DURATION.is_match(raw)
}

/// Accepts a calendar date, an RFC 3339 datetime, or a local datetime without offset.
#[must_use]
pub fn is_iso8601_datetime(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_accepts_common_forms() {
        for raw in ["PT1H", "P1Y2M3DT4H5M6S", "P3D", "P2W", "P1.5W", "PT0,5S", "P1DT12H", "PT"] {
            assert!(is_iso8601_duration(raw), "{raw} must be accepted");
        }
    }

    #[test]
    fn duration_rejects_malformed_forms() {
        for raw in [
            "", "P", "1H", "PT1X", "P1H", "PT1S1M", "P1.5YT1H", "P1.5Y2M", "P1W2D", "foo", "PT1.H", "P\u{661}D",
        ] {
            assert!(!is_iso8601_duration(raw), "{raw} must be rejected");
        }
    }

    #[test]
    fn datetime_accepts_dates_and_rfc3339() {
        assert!(is_iso8601_datetime("2025-01-31"));
        assert!(is_iso8601_datetime("2025-01-31T10:00:00Z"));
        assert!(is_iso8601_datetime("2025-01-31T10:00:00.123+02:00"));
        assert!(is_iso8601_datetime("2025-01-31T10:00:00"));
        assert!(!is_iso8601_datetime("next tuesday"));
        assert!(!is_iso8601_datetime("2025-13-01"));
    }
}
