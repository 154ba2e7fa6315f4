//! # Frete Rápido Client
//!
//! [`FreightProvider`] implementation for the Frete Rápido quote simulator
//! (`POST /api/v3/quote/simulate`).
//!
//! The client owns the translation in both directions: a validated
//! [`Shipment`] becomes a [`SimulateRequest`] (shipper identity from
//! configuration, a single dispatcher carrying every volume), and the
//! nested `dispatchers[].offers[]` answer is flattened into one ordered
//! list of [`ProviderOffer`]s.

use crate::domain::entities::{Shipment, Volume};
use crate::infrastructure::config::ProviderConfig;
use crate::infrastructure::provider::error::ProviderResult;
use crate::infrastructure::provider::http_client::HttpClient;
use crate::infrastructure::provider::traits::{FreightProvider, ProviderOffer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Path of the simulation endpoint, relative to the base URL.
pub const SIMULATE_PATH: &str = "/api/v3/quote/simulate";

/// Dispatcher postal code used when the configured one parses to zero.
pub const FALLBACK_DISPATCHER_ZIPCODE: u32 = 29_161_376;

/// Recipient type: natural person.
const RECIPIENT_TYPE_PERSON: u8 = 0;

/// Recipient country code.
const RECIPIENT_COUNTRY: &str = "BRA";

/// Simulation type: fractional freight.
const SIMULATION_TYPE_FRACTIONAL: u8 = 0;

/// Simulation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateRequest {
    /// Who is shipping.
    pub shipper: ShipperPayload,
    /// Where it goes.
    pub recipient: RecipientPayload,
    /// Origins and their volumes.
    pub dispatchers: Vec<DispatcherPayload>,
    /// Simulation type selectors.
    pub simulation_type: Vec<u8>,
}

/// Shipper identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipperPayload {
    /// Shipper CNPJ.
    pub registered_number: String,
    /// API token.
    pub token: String,
    /// Platform code.
    pub platform_code: String,
}

/// Recipient location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientPayload {
    /// Recipient type (0 = person).
    #[serde(rename = "type")]
    pub kind: u8,
    /// ISO country code.
    pub country: String,
    /// Postal code as an integer.
    pub zipcode: u32,
}

/// One origin and the volumes shipped from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherPayload {
    /// Dispatcher CNPJ.
    pub registered_number: String,
    /// Dispatcher postal code.
    pub zipcode: u32,
    /// Volumes.
    pub volumes: Vec<VolumePayload>,
}

/// One volume line in provider format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePayload {
    /// Units.
    pub amount: u32,
    /// Category code, stringified.
    pub category: String,
    /// Optional SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Height.
    pub height: f64,
    /// Width.
    pub width: f64,
    /// Length.
    pub length: f64,
    /// Price of one unit.
    pub unitary_price: f64,
    /// Weight of one unit.
    pub unitary_weight: f64,
}

impl From<&Volume> for VolumePayload {
    fn from(volume: &Volume) -> Self {
        Self {
            amount: volume.amount(),
            category: volume.category().to_string(),
            sku: volume.sku().map(str::to_string),
            height: volume.height(),
            width: volume.width(),
            length: volume.length(),
            unitary_price: volume.price(),
            unitary_weight: volume.unitary_weight(),
        }
    }
}

/// Simulation response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulateResponse {
    /// Results per dispatcher.
    #[serde(default)]
    pub dispatchers: Vec<DispatcherResult>,
}

/// Offers computed for one dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatcherResult {
    /// Offers, in provider order.
    #[serde(default)]
    pub offers: Vec<OfferPayload>,
}

/// One offer in provider format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferPayload {
    /// Carrier identity.
    #[serde(default)]
    pub carrier: CarrierPayload,
    /// Delivery estimate.
    #[serde(default)]
    pub delivery_time: DeliveryTimePayload,
    /// Final price.
    #[serde(default)]
    pub final_price: f64,
}

/// Carrier identity in provider format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierPayload {
    /// Carrier name.
    #[serde(default)]
    pub name: String,
    /// Service name.
    #[serde(default)]
    pub service: String,
}

/// Delivery estimate in provider format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTimePayload {
    /// Days until delivery; may be negative in malformed answers.
    #[serde(default)]
    pub days: i64,
}

impl SimulateResponse {
    /// Flattens every dispatcher's offers into one list, preserving order.
    #[must_use]
    pub fn into_offers(self) -> Vec<ProviderOffer> {
        flatten_offers(self.dispatchers.into_iter().map(|d| d.offers))
    }
}

/// Collapses a sequence of offer sequences into normalized offers.
///
/// Order is outer-then-inner, exactly as received. Negative delivery days
/// become zero.
pub fn flatten_offers<I>(groups: I) -> Vec<ProviderOffer>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = OfferPayload>,
{
    groups
        .into_iter()
        .flatten()
        .map(|offer| ProviderOffer {
            carrier_name: offer.carrier.name,
            service: offer.carrier.service,
            deadline_days: clamp_days(offer.delivery_time.days),
            final_price: offer.final_price,
        })
        .collect()
}

fn clamp_days(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Resolves the configured dispatcher postal code, falling back to
/// [`FALLBACK_DISPATCHER_ZIPCODE`] when it does not parse to a non-zero
/// number. Postal codes are unsigned, so negative or out-of-range values
/// also fall back.
#[must_use]
pub fn dispatcher_zipcode(configured: &str) -> u32 {
    match configured.trim().parse::<u32>() {
        Ok(0) | Err(_) => FALLBACK_DISPATCHER_ZIPCODE,
        Ok(zipcode) => zipcode,
    }
}

/// Frete Rápido freight provider.
#[derive(Debug, Clone)]
pub struct FreteRapidoClient {
    http: HttpClient,
    base_url: String,
    shipper: ShipperPayload,
    dispatcher_zipcode: u32,
}

impl FreteRapidoClient {
    /// Creates a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            http: HttpClient::new(config.timeout_ms)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            shipper: ShipperPayload {
                registered_number: config.shipper_cnpj.clone(),
                token: config.token.clone(),
                platform_code: config.platform_code.clone(),
            },
            dispatcher_zipcode: dispatcher_zipcode(&config.dispatcher_zipcode),
        })
    }

    /// Returns the full simulate URL.
    #[must_use]
    pub fn simulate_url(&self) -> String {
        format!("{}{}", self.base_url, SIMULATE_PATH)
    }

    /// Translates a shipment into the provider's request body.
    #[must_use]
    pub fn build_request(&self, shipment: &Shipment) -> SimulateRequest {
        SimulateRequest {
            shipper: self.shipper.clone(),
            recipient: RecipientPayload {
                kind: RECIPIENT_TYPE_PERSON,
                country: RECIPIENT_COUNTRY.to_string(),
                zipcode: shipment.zipcode().as_number(),
            },
            dispatchers: vec![DispatcherPayload {
                registered_number: self.shipper.registered_number.clone(),
                zipcode: self.dispatcher_zipcode,
                volumes: shipment.volumes().iter().map(VolumePayload::from).collect(),
            }],
            simulation_type: vec![SIMULATION_TYPE_FRACTIONAL],
        }
    }
}

#[async_trait]
impl FreightProvider for FreteRapidoClient {
    fn name(&self) -> &str {
        "Frete Rápido"
    }

    #[instrument(
        skip_all,
        fields(
            zipcode = %shipment.zipcode(),
            volumes = shipment.volumes().len(),
            timeout_ms = self.http.timeout_ms(),
        )
    )]
    async fn simulate(&self, shipment: &Shipment) -> ProviderResult<Vec<ProviderOffer>> {
        let request = self.build_request(shipment);
        let response: SimulateResponse = self.http.post(&self.simulate_url(), &request).await?;
        let offers = response.into_offers();
        debug!(offers = offers.len(), "simulation answered");
        Ok(offers)
    }
}
