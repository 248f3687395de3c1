//! ISO-8601 timestamps as they appear in the source records.
//!
//! Offsets are honored and converted to UTC. Timestamps without an offset
//! are taken as UTC, and a bare date means midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use super::ParseError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let value = value.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(ParseError::Timestamp {
        value: value.to_string(),
        source: rfc3339_err,
    })
}

/// RFC 3339 with a `Z` suffix and whole seconds.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Optional timestamps: `null`, a missing key and `""` all mean `None`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_utc_and_offsets() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:00:00Z").ok(), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00:00.000Z").ok(), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:00:00+02:00").ok(), Some(expected));
    }

    #[test]
    fn naive_forms_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:00:00").ok(), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:00:00").ok(), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00").ok(), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01").ok(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn malformed_timestamp_names_value() {
        let err = parse_timestamp("yesterday");
        assert!(matches!(err, Err(ParseError::Timestamp { ref value, .. }) if value == "yesterday"));
    }

    #[test]
    fn formats_with_z_suffix() {
        let t = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&t), "2024-01-08T00:00:00Z");
    }
}
