//! Serde helpers for persisted timestamps.
//!
//! Timestamps are written as RFC 3339. Files produced by earlier releases
//! hold naive ISO 8601 values without an offset; those are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn parse<E: serde::de::Error>(text: &str) -> Result<DateTime<Utc>, E> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, NAIVE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| E::custom(format!("invalid timestamp: {text}")))
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => super::serialize(dt, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::core::timestamp")]
        at: DateTime<Utc>,
    }

    fn read(text: &str) -> Result<DateTime<Utc>, serde_json::Error> {
        serde_json::from_value::<Stamped>(serde_json::json!({ "at": text })).map(|s| s.at)
    }

    #[test]
    fn test_reads_rfc3339_with_offset() {
        let at = read("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_reads_naive_isoformat_as_utc() {
        let at = read("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(at.hour(), 10);
        assert_eq!(at.nanosecond(), 123_456_000);

        let whole_seconds = read("2024-05-01T10:00:00").unwrap();
        assert_eq!(whole_seconds, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(read("yesterday").is_err());
    }

    #[test]
    fn test_writes_rfc3339() {
        let stamped = Stamped {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&stamped).unwrap();
        assert_eq!(json["at"], "2024-05-01T10:00:00+00:00");
    }
}
