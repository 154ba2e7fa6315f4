//! # In-Memory Quote Repository
//!
//! In-memory implementation of [`QuoteRepository`].
//!
//! Mirrors the PostgreSQL behavior: the offer-to-quote reference is
//! enforced, duplicate IDs are rejected, and metrics follow the same
//! selection and grouping rules.

use crate::domain::entities::{Offer, Quote};
use crate::domain::value_objects::QuoteId;
use crate::domain::{CarrierMetrics, MetricsResponse};
use crate::infrastructure::persistence::traits::{
    QuoteRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroU64;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Storage {
    /// Quotes in insertion order; position breaks creation-time ties.
    quotes: Vec<Quote>,
    offers: Vec<Offer>,
}

/// In-memory implementation of [`QuoteRepository`].
///
/// Uses a `tokio::sync::RwLock` around plain vectors. Cloning shares the
/// same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteRepository {
    storage: Arc<RwLock<Storage>>,
}

impl InMemoryQuoteRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored quotes.
    pub async fn quote_count(&self) -> usize {
        self.storage.read().await.quotes.len()
    }

    /// Returns the number of stored offers.
    pub async fn offer_count(&self) -> usize {
        self.storage.read().await.offers.len()
    }

    /// Returns the offers stored under `quote_id`, in insertion order.
    pub async fn offers_for(&self, quote_id: QuoteId) -> Vec<Offer> {
        self.storage
            .read()
            .await
            .offers
            .iter()
            .filter(|o| o.quote_id() == quote_id)
            .cloned()
            .collect()
    }

    /// Returns all stored quotes, in insertion order.
    pub async fn quotes(&self) -> Vec<Quote> {
        self.storage.read().await.quotes.clone()
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create_quote(&self, quote: &Quote) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.quotes.iter().any(|q| q.id() == quote.id()) {
            return Err(RepositoryError::duplicate("Quote", quote.id().to_string()));
        }
        storage.quotes.push(quote.clone());
        Ok(())
    }

    async fn create_offer(&self, offer: &Offer) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if !storage.quotes.iter().any(|q| q.id() == offer.quote_id()) {
            return Err(RepositoryError::not_found(
                "Quote",
                offer.quote_id().to_string(),
            ));
        }
        if storage.offers.iter().any(|o| o.id() == offer.id()) {
            return Err(RepositoryError::duplicate("Offer", offer.id().to_string()));
        }
        storage.offers.push(offer.clone());
        Ok(())
    }

    async fn get_metrics(
        &self,
        last_quotes: Option<NonZeroU64>,
    ) -> RepositoryResult<MetricsResponse> {
        let storage = self.storage.read().await;

        // most recent first; later insertion wins on equal timestamps
        let mut ordered: Vec<(usize, &Quote)> = storage.quotes.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| ib.cmp(ia))
        });

        let limit = last_quotes
            .map(|n| usize::try_from(n.get()).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let selected: HashSet<QuoteId> = ordered
            .into_iter()
            .take(limit)
            .map(|(_, q)| q.id())
            .collect();

        Ok(aggregate(
            storage
                .offers
                .iter()
                .filter(|o| selected.contains(&o.quote_id())),
        ))
    }
}

/// Groups offers by carrier name and computes count/sum/average plus the
/// overall min and max price.
fn aggregate<'a>(offers: impl Iterator<Item = &'a Offer>) -> MetricsResponse {
    let mut groups: BTreeMap<&str, (u64, Decimal)> = BTreeMap::new();
    let mut cheapest: Option<Decimal> = None;
    let mut most_expensive: Option<Decimal> = None;

    for offer in offers {
        let price = offer.final_price();
        let entry = groups
            .entry(offer.carrier_name())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += price;
        cheapest = Some(cheapest.map_or(price, |c| c.min(price)));
        most_expensive = Some(most_expensive.map_or(price, |m| m.max(price)));
    }

    let by_carrier = groups
        .into_iter()
        .map(|(name, (count, sum))| CarrierMetrics {
            carrier_name: name.to_string(),
            total_quotes: count,
            total_freight: to_f64(sum),
            average_freight: to_f64(sum / Decimal::from(count)),
        })
        .collect();

    MetricsResponse {
        by_carrier,
        cheapest: cheapest.map_or(0.0, to_f64),
        most_expensive: most_expensive.map_or(0.0, to_f64),
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.normalize().to_f64().unwrap_or_default()
}
