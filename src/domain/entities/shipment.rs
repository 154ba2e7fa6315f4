//! # Shipment
//!
//! A validated quote request: where the packages go and what they are.
//! Only the validation module builds these from raw input; everything
//! downstream can rely on the field constraints holding.

use crate::domain::value_objects::Zipcode;
use serde::{Deserialize, Serialize};

/// One package line of a shipment.
///
/// # Invariants
///
/// - `category` and `amount` are at least 1
/// - `unitary_weight`, `height`, `width`, `length` are strictly positive
/// - `price` is non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    category: u32,
    amount: u32,
    unitary_weight: f64,
    price: f64,
    sku: Option<String>,
    height: f64,
    width: f64,
    length: f64,
}

impl Volume {
    /// Creates a volume from already-checked values.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        category: u32,
        amount: u32,
        unitary_weight: f64,
        price: f64,
        sku: Option<String>,
        height: f64,
        width: f64,
        length: f64,
    ) -> Self {
        Self {
            category,
            amount,
            unitary_weight,
            price,
            sku,
            height,
            width,
            length,
        }
    }

    /// Returns the category code.
    #[inline]
    #[must_use]
    pub fn category(&self) -> u32 {
        self.category
    }

    /// Returns the number of units.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns the weight of one unit.
    #[inline]
    #[must_use]
    pub fn unitary_weight(&self) -> f64 {
        self.unitary_weight
    }

    /// Returns the price of one unit.
    #[inline]
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Returns the SKU, if any.
    #[inline]
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    /// Returns the height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// A validated request for freight offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    zipcode: Zipcode,
    volumes: Vec<Volume>,
}

impl Shipment {
    /// Creates a shipment. `volumes` is expected to be non-empty.
    #[must_use]
    pub fn new(zipcode: Zipcode, volumes: Vec<Volume>) -> Self {
        Self { zipcode, volumes }
    }

    /// Returns the recipient postal code.
    #[inline]
    #[must_use]
    pub fn zipcode(&self) -> &Zipcode {
        &self.zipcode
    }

    /// Returns the package lines in request order.
    #[inline]
    #[must_use]
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }
}
