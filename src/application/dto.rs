//! # Data Transfer Objects
//!
//! JSON shapes accepted and returned by the quote API.
//!
//! Request fields are optional at this level so that a missing field is
//! reported by the validation module with a field-level message, while a
//! field of the wrong JSON type is rejected by deserialization.

use crate::infrastructure::provider::ProviderOffer;
use serde::{Deserialize, Serialize};

/// Incoming `POST /quote` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Recipient.
    #[serde(default)]
    pub recipient: Option<RecipientRequest>,
    /// Package lines.
    #[serde(default)]
    pub volumes: Option<Vec<VolumeRequest>>,
}

/// Recipient section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRequest {
    /// Recipient address.
    #[serde(default)]
    pub address: Option<AddressRequest>,
}

/// Recipient address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Postal code (CEP), eight digits.
    #[serde(default)]
    pub zipcode: Option<String>,
}

/// One package line as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeRequest {
    /// Category code.
    #[serde(default)]
    pub category: Option<i64>,
    /// Number of units.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Weight of one unit.
    #[serde(default)]
    pub unitary_weight: Option<f64>,
    /// Price of one unit.
    #[serde(default)]
    pub price: Option<f64>,
    /// Optional SKU.
    #[serde(default)]
    pub sku: Option<String>,
    /// Height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Width.
    #[serde(default)]
    pub width: Option<f64>,
    /// Length.
    #[serde(default)]
    pub length: Option<f64>,
}

impl QuoteRequest {
    /// Builds a request for `zipcode` with the given volumes.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn new(zipcode: impl Into<String>, volumes: Vec<VolumeRequest>) -> Self {
        Self {
            recipient: Some(RecipientRequest {
                address: Some(AddressRequest {
                    zipcode: Some(zipcode.into()),
                }),
            }),
            volumes: Some(volumes),
        }
    }
}

/// One carrier offer in the public response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierOffer {
    /// Carrier name.
    pub name: String,
    /// Service name.
    pub service: String,
    /// Delivery deadline in days, as a string.
    pub deadline: String,
    /// Final price.
    pub price: f64,
}

impl From<&ProviderOffer> for CarrierOffer {
    fn from(offer: &ProviderOffer) -> Self {
        Self {
            name: offer.carrier_name.clone(),
            service: offer.service.clone(),
            deadline: offer.deadline_days.to_string(),
            price: offer.final_price,
        }
    }
}

/// `POST /quote` success body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Offers in provider order; possibly empty.
    pub carrier: Vec<CarrierOffer>,
}

impl QuoteResponse {
    /// Returns a response with no offers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
