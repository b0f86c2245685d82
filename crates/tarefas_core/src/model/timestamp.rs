//! Wall-clock timestamps in the persisted ISO-8601 shape.
//!
//! Stored values look like `2024-05-01T10:20:30.123Z`: UTC, millisecond
//! precision, `Z` suffix. Anything RFC 3339 is accepted on read and
//! truncated to milliseconds, so a loaded value re-saves unchanged.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

pub type Timestamp = DateTime<Utc>;

/// Current instant truncated to milliseconds, so a persisted value reads
/// back equal to the in-memory one.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

pub fn format(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc).trunc_subsecs(3))
}

/// `#[serde(with = "iso_millis")]` adapter for required timestamps.
pub mod iso_millis {
    use super::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Same as [`iso_millis`] for optional fields such as `updatedAt`.
pub mod iso_millis_option {
    use super::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&super::format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format, now, parse};

    #[test]
    fn format_uses_millis_and_z_suffix() {
        let value = parse("2024-05-01T10:20:30.123Z").unwrap();
        assert_eq!(format(&value), "2024-05-01T10:20:30.123Z");
    }

    #[test]
    fn parse_normalizes_offsets_to_utc() {
        let value = parse("2024-05-01T12:20:30.000+02:00").unwrap();
        assert_eq!(format(&value), "2024-05-01T10:20:30.000Z");
    }

    #[test]
    fn parse_truncates_sub_millisecond_precision() {
        let value = parse("2024-05-01T10:20:30.123456789Z").unwrap();
        assert_eq!(value, parse("2024-05-01T10:20:30.123Z").unwrap());
        assert_eq!(format(&value), "2024-05-01T10:20:30.123Z");
    }

    #[test]
    fn now_survives_format_parse() {
        let value = now();
        assert_eq!(parse(&format(&value)).unwrap(), value);
    }
}
