//! # Timestamp Value Object
//!
//! UTC wall-clock instant used for quote creation times.
//!
//! # Examples
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use freight_quote::domain::value_objects::timestamp::Timestamp;
//!
//! let created = Timestamp::now();
//! let stored: DateTime<Utc> = created.into();
//! assert_eq!(Timestamp::from(stored), created);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`; always in UTC, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> Timestamp {
        Utc.timestamp_millis_opt(millis).single().unwrap().into()
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(at(1_000) < at(2_000));
        assert!(Timestamp::now() > at(0));
    }

    #[test]
    fn display_is_rfc3339() {
        assert_eq!(at(0).to_string(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn datetime_conversions() {
        let dt = Utc.timestamp_millis_opt(42_000).single().unwrap();
        let ts: Timestamp = dt.into();
        let back: DateTime<Utc> = ts.into();
        assert_eq!(dt, back);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&at(0)).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00Z\"");
    }
}
