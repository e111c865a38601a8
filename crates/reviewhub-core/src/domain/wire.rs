//! Wire-format helpers shared by every entity.
//!
//! The data endpoints are loose about types: ids and foreign keys show up as
//! JSON numbers or as numeric strings, and timestamps are either full RFC 3339
//! strings or bare dates. Everything is normalized here on the way in, and
//! written back the way a browser's `toISOString()` would on the way out.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_id(s).map(Self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

numeric_id!(
    /// Server-assigned review id.
    ReviewId
);
numeric_id!(
    /// Server-assigned comment id.
    CommentId
);
numeric_id!(
    /// User id, also used as the owner reference on reviews and comments.
    UserId
);

fn parse_id(raw: &str) -> Result<u64, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::Validation(format!("'{raw}' is not a valid id")))
}

struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer id or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(v as u64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format like `Date.prototype.toISOString`: `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `#[serde(with = "...")]` adapter for entity timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// A draft stamped with client-side creation timestamps, ready to be posted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl<T> Stamped<T> {
    pub fn at(record: T, now: DateTime<Utc>) -> Self {
        Self {
            record,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_accept_numbers_and_numeric_strings() {
        let from_number: ReviewId = serde_json::from_str("2").unwrap();
        let from_string: ReviewId = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!("2".parse::<ReviewId>().unwrap(), ReviewId(2));
        assert_eq!(" 2 ".parse::<ReviewId>().unwrap(), ReviewId(2));
    }

    #[test]
    fn test_ids_reject_garbage() {
        assert!(serde_json::from_str::<UserId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<UserId>("-1").is_err());
        assert!(matches!(
            "x1".parse::<CommentId>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&CommentId(7)).unwrap(), "7");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T09:00:00+09:00"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_format_timestamp_uses_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-02-01T12:30:00.000Z");
    }
}
