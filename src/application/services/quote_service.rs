//! # Quote Service
//!
//! Orchestrates the `POST /quote` use case.
//!
//! The flow is strictly sequential:
//!
//! 1. Validate the request and build a [`Shipment`]
//! 2. Run one provider simulation
//! 3. Flatten the offers into the response shape
//! 4. Stop here when there are no offers (nothing is stored)
//! 5. Store the quote, then each offer in provider order
//! 6. Return the offers
//!
//! Steps 2 to 5 share one deadline. When it expires the in-flight call is
//! dropped and the request fails with a timeout.

use crate::application::dto::{CarrierOffer, QuoteRequest, QuoteResponse};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::validation::validate_quote_request;
use crate::domain::entities::{Offer, Quote, Shipment, parse_deadline_days, price_from_f64};
use crate::domain::value_objects::QuoteId;
use crate::infrastructure::config::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::infrastructure::persistence::QuoteRepository;
use crate::infrastructure::provider::{FreightProvider, ProviderError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Runs quote simulations and stores their results.
#[derive(Debug, Clone)]
pub struct QuoteService {
    repository: Arc<dyn QuoteRepository>,
    provider: Arc<dyn FreightProvider>,
    timeout: Duration,
}

impl QuoteService {
    /// Creates a new service with the default request deadline.
    #[must_use]
    pub fn new(repository: Arc<dyn QuoteRepository>, provider: Arc<dyn FreightProvider>) -> Self {
        Self {
            repository,
            provider,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Sets the request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates `request`, simulates it and stores the outcome.
    ///
    /// # Errors
    ///
    /// - `Validation` if the request is invalid; nothing else runs
    /// - `ExternalService` if the provider fails or sends an unusable price
    /// - `Persistence` if a write fails; earlier writes are kept
    /// - `Timeout` if the deadline expires
    pub async fn create_quote(&self, request: &QuoteRequest) -> ApplicationResult<QuoteResponse> {
        let shipment = validate_quote_request(request).inspect_err(|errors| {
            let fields: Vec<&str> = errors.violations().iter().map(|v| v.path.as_str()).collect();
            debug!(?fields, "quote request rejected");
        })?;

        match timeout(self.timeout, self.simulate_and_store(&shipment)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    zipcode = %shipment.zipcode(),
                    "quote request timed out"
                );
                Err(ApplicationError::timeout(format!(
                    "quote request exceeded {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }

    #[instrument(skip_all, fields(zipcode = %shipment.zipcode(), volumes = shipment.volumes().len()))]
    async fn simulate_and_store(&self, shipment: &Shipment) -> ApplicationResult<QuoteResponse> {
        let provider_offers = self.provider.simulate(shipment).await.map_err(|e| {
            warn!(
                provider = self.provider.name(),
                status = e.status_code(),
                timeout = e.is_timeout(),
                error = %e,
                "freight simulation failed"
            );
            ApplicationError::from(e)
        })?;

        let carrier: Vec<CarrierOffer> = provider_offers.iter().map(CarrierOffer::from).collect();
        if carrier.is_empty() {
            warn!(provider = self.provider.name(), "simulation returned no offers");
            return Ok(QuoteResponse::empty());
        }

        let quote = Quote::new(shipment.zipcode().clone());
        let offers = build_offers(quote.id(), &carrier)?;

        self.repository.create_quote(&quote).await.map_err(|e| {
            error!(quote_id = %quote.id(), error = %e, "failed to store quote");
            ApplicationError::from(e)
        })?;

        for (written, offer) in offers.iter().enumerate() {
            if let Err(e) = self.repository.create_offer(offer).await {
                error!(
                    quote_id = %quote.id(),
                    written,
                    total = offers.len(),
                    error = %e,
                    "failed to store offer"
                );
                return Err(e.into());
            }
        }

        info!(quote_id = %quote.id(), offers = offers.len(), "quote stored");
        Ok(QuoteResponse { carrier })
    }
}

/// Converts response offers into stored offers, rejecting unusable prices
/// before anything is written.
fn build_offers(quote_id: QuoteId, carrier: &[CarrierOffer]) -> ApplicationResult<Vec<Offer>> {
    carrier
        .iter()
        .map(|c| {
            let price = price_from_f64(c.price)
                .map_err(|e| ProviderError::protocol(format!("{}: {e}", c.name)))?;
            Offer::new(
                quote_id,
                c.name.as_str(),
                c.service.as_str(),
                parse_deadline_days(&c.deadline),
                price,
            )
            .map_err(|e| ProviderError::protocol(format!("{}: {e}", c.name)).into())
        })
        .collect()
}
