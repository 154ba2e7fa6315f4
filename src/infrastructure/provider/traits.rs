//! # Freight Provider Trait
//!
//! Port definition for the external freight-quoting integration.
//!
//! # Examples
//!
//! ```ignore
//! use freight_quote::infrastructure::provider::traits::FreightProvider;
//!
//! async fn cheapest(provider: &dyn FreightProvider, shipment: &Shipment) -> Option<f64> {
//!     let offers = provider.simulate(shipment).await.ok()?;
//!     offers.iter().map(|o| o.final_price).reduce(f64::min)
//! }
//! ```

use crate::domain::entities::Shipment;
use crate::infrastructure::provider::error::ProviderResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One carrier option as returned by a provider, already normalized.
///
/// `deadline_days` is clamped to zero when the provider sends a negative
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOffer {
    /// Carrier name.
    pub carrier_name: String,
    /// Carrier service name.
    pub service: String,
    /// Delivery time in days.
    pub deadline_days: u32,
    /// Final price charged for the shipment.
    pub final_price: f64,
}

/// Trait for freight-quoting providers.
///
/// Implementations issue exactly one simulation call per invocation and
/// never retry.
#[async_trait]
pub trait FreightProvider: Send + Sync + fmt::Debug {
    /// Returns the provider name, for logs and error context.
    fn name(&self) -> &str;

    /// Runs a freight simulation for `shipment`.
    ///
    /// Returns every offer across every dispatcher, in provider order.
    /// An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the call cannot be issued, the provider
    /// answers with a non-success status, or the body cannot be parsed.
    async fn simulate(&self, shipment: &Shipment) -> ProviderResult<Vec<ProviderOffer>>;
}
