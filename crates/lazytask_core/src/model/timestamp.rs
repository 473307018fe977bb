//! ISO-8601 timestamp helpers shared by project and task records.
//!
//! # Invariants
//! - Timestamps are UTC with millisecond precision.
//! - Rendered form always carries three fractional digits and a `Z` suffix,
//!   so values survive a store round-trip unchanged.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// UTC instant used for `createdAt` / `completedAt`.
pub type Timestamp = DateTime<Utc>;

/// Returns the current instant truncated to milliseconds.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

/// Renders a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp, normalizing any offset to UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Serde adapter for required timestamp fields.
pub mod iso {
    use super::{format_timestamp, parse_timestamp, Timestamp};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp `{raw}`")))
    }
}

/// Serde adapter for nullable timestamp fields.
pub mod iso_opt {
    use super::{format_timestamp, parse_timestamp, Timestamp};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp `{raw}`"))),
        }
    }
}
