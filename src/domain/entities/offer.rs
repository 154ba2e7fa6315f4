//! # Offer Entity
//!
//! One carrier's priced, dated shipping option stored under a [`Quote`].
//!
//! [`Quote`]: crate::domain::entities::Quote

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{OfferId, QuoteId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale of stored prices (`DECIMAL(12,2)`).
pub const PRICE_SCALE: u32 = 2;

/// A stored carrier offer.
///
/// # Invariants
///
/// - `final_price` is non-negative, rounded to [`PRICE_SCALE`] places
/// - `deadline_days` is never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    quote_id: QuoteId,
    carrier_name: String,
    service: String,
    deadline_days: u32,
    final_price: Decimal,
}

impl Offer {
    /// Creates a new offer owned by `quote_id`, with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the price is negative.
    pub fn new(
        quote_id: QuoteId,
        carrier_name: impl Into<String>,
        service: impl Into<String>,
        deadline_days: u32,
        final_price: Decimal,
    ) -> DomainResult<Self> {
        if final_price < Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!(
                "final price must not be negative: {final_price}"
            )));
        }

        Ok(Self {
            id: OfferId::new_v4(),
            quote_id,
            carrier_name: carrier_name.into(),
            service: service.into(),
            deadline_days,
            final_price: final_price.round_dp(PRICE_SCALE),
        })
    }

    /// Returns the offer ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the owning quote ID.
    #[inline]
    #[must_use]
    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    /// Returns the carrier name.
    #[inline]
    #[must_use]
    pub fn carrier_name(&self) -> &str {
        &self.carrier_name
    }

    /// Returns the carrier service name.
    #[inline]
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the delivery deadline in days.
    #[inline]
    #[must_use]
    pub fn deadline_days(&self) -> u32 {
        self.deadline_days
    }

    /// Returns the final price.
    #[inline]
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        self.final_price
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offer({} {} {}d @ {})",
            self.carrier_name, self.service, self.deadline_days, self.final_price
        )
    }
}

/// Parses a deadline in days, clamping negatives and garbage to zero.
///
/// # Examples
///
/// ```
/// use freight_quote::domain::entities::offer::parse_deadline_days;
///
/// assert_eq!(parse_deadline_days("3"), 3);
/// assert_eq!(parse_deadline_days("-2"), 0);
/// assert_eq!(parse_deadline_days("soon"), 0);
/// ```
#[must_use]
pub fn parse_deadline_days(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or(0)
}

/// Converts a wire price into a stored decimal.
///
/// # Errors
///
/// Returns `DomainError::InvalidPrice` for non-finite input.
pub fn price_from_f64(price: f64) -> DomainResult<Decimal> {
    Decimal::from_f64(price)
        .map(|d| d.round_dp(PRICE_SCALE))
        .ok_or_else(|| DomainError::InvalidPrice(format!("not representable: {price}")))
}
