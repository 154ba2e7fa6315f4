//! # Quote Entity
//!
//! A persisted record of one recipient postal code for which carrier
//! offers were simulated.
//!
//! # Examples
//!
//! ```
//! use freight_quote::domain::entities::quote::Quote;
//! use freight_quote::domain::value_objects::Zipcode;
//!
//! let quote = Quote::new(Zipcode::parse("01311000").unwrap());
//! assert_eq!(quote.zipcode().as_str(), "01311000");
//! ```

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{QuoteId, Zipcode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored quote.
///
/// Created once per successful simulation that yields at least one offer.
/// Never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier.
    id: QuoteId,
    /// Recipient postal code.
    zipcode: Zipcode,
    /// When this quote was created.
    created_at: Timestamp,
}

impl Quote {
    /// Creates a new quote with a fresh identifier and the current time.
    #[must_use]
    pub fn new(zipcode: Zipcode) -> Self {
        Self {
            id: QuoteId::new_v4(),
            zipcode,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a quote with a fixed identifier and creation time.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn from_parts(id: QuoteId, zipcode: Zipcode, created_at: Timestamp) -> Self {
        Self {
            id,
            zipcode,
            created_at,
        }
    }

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns the recipient postal code.
    #[inline]
    #[must_use]
    pub fn zipcode(&self) -> &Zipcode {
        &self.zipcode
    }

    /// Returns when this quote was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quote({} to {})", self.id, self.zipcode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_assigns_fresh_ids() {
        let zip = Zipcode::parse("01311000").unwrap();
        let a = Quote::new(zip.clone());
        let b = Quote::new(zip);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn from_parts_preserves_fields() {
        let id = QuoteId::new_v4();
        let ts = Timestamp::from(chrono::Utc.timestamp_millis_opt(1_000).single().unwrap());
        let quote = Quote::from_parts(id, Zipcode::parse("29161376").unwrap(), ts);
        assert_eq!(quote.id(), id);
        assert_eq!(quote.created_at(), ts);
        assert!(quote.to_string().contains("29161376"));
    }
}
