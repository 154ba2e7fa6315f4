//! # Domain Entities
//!
//! - [`Shipment`]: validated request (recipient + volumes), transient
//! - [`Quote`]: one simulated recipient postal code, persisted
//! - [`Offer`]: one carrier option stored under a quote

pub mod offer;
pub mod quote;
pub mod shipment;

pub use offer::{Offer, PRICE_SCALE, parse_deadline_days, price_from_f64};
pub use quote::Quote;
pub use shipment::{Shipment, Volume};
