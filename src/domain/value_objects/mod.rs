//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`QuoteId`], [`OfferId`]: UUID-based identifiers
//! - [`Zipcode`]: eight-digit Brazilian postal code
//! - [`Timestamp`]: UTC instant

pub mod ids;
pub mod timestamp;
pub mod zipcode;

pub use ids::{OfferId, QuoteId};
pub use timestamp::Timestamp;
pub use zipcode::{ZIPCODE_LEN, Zipcode};
