//! Creation timestamps reported by the backend.

use core::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time, normalized to UTC.
///
/// Accepts RFC 3339 strings with an offset (`2025-03-01T10:00:00Z`) as well
/// as offset-less local timestamps (`2025-03-01T10:00:00.123456`), which are
/// read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC datetime.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse either timestamp shape.
    ///
    /// # Errors
    ///
    /// Returns the last parse error if neither shape matches.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(at.with_timezone(&Utc)));
        }
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))?;
        Ok(Self(naive.and_utc()))
    }

    /// The wrapped datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rfc3339() {
        let ts = Timestamp::parse("2025-03-01T10:00:00+08:00").unwrap();
        assert_eq!(ts.to_string(), "2025-03-01 02:00");
    }

    #[test]
    fn test_parses_local_datetime() {
        let ts = Timestamp::parse("2025-03-01T10:00:00.123456").unwrap();
        assert_eq!(ts.to_string(), "2025-03-01 10:00");
        assert!(Timestamp::parse("2025-03-01 10:00:00").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }
}
