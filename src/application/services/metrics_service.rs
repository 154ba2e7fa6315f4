//! # Metrics Service
//!
//! Serves `GET /metrics`: parses the optional `last_quotes` bound and asks
//! the repository for the aggregate.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::MetricsResponse;
use crate::infrastructure::config::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::infrastructure::persistence::QuoteRepository;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

/// Message returned when `last_quotes` is not a positive integer.
pub const INVALID_LAST_QUOTES_MESSAGE: &str =
    "O parâmetro last_quotes deve ser um número inteiro positivo (ex.: 10)";

/// Parses the raw `last_quotes` query value.
///
/// An empty value means "every quote".
///
/// # Errors
///
/// Returns `InvalidParameter` for anything that is not a positive integer.
pub fn parse_last_quotes(raw: &str) -> ApplicationResult<Option<NonZeroU64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .ok()
        .and_then(NonZeroU64::new)
        .map(Some)
        .ok_or_else(|| ApplicationError::invalid_parameter("last_quotes", INVALID_LAST_QUOTES_MESSAGE))
}

/// Aggregates stored offers.
#[derive(Debug, Clone)]
pub struct MetricsService {
    repository: Arc<dyn QuoteRepository>,
    timeout: Duration,
}

impl MetricsService {
    /// Creates a new service with the default request deadline.
    #[must_use]
    pub fn new(repository: Arc<dyn QuoteRepository>) -> Self {
        Self {
            repository,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Sets the request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns metrics over the `last_quotes` most recent quotes.
    ///
    /// `last_quotes` is the raw query value; `None` or empty means all.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `last_quotes` is not a positive integer
    /// - `Persistence` if the query fails
    /// - `Timeout` if the deadline expires
    #[instrument(skip(self))]
    pub async fn get_metrics(&self, last_quotes: Option<&str>) -> ApplicationResult<MetricsResponse> {
        let bound = parse_last_quotes(last_quotes.unwrap_or_default())?;

        match timeout(self.timeout, self.repository.get_metrics(bound)).await {
            Ok(Ok(metrics)) => {
                debug!(
                    carriers = metrics.by_carrier.len(),
                    offers = metrics.total_offers(),
                    "metrics aggregated"
                );
                Ok(metrics)
            }
            Ok(Err(e)) => {
                error!(error = %e, "failed to aggregate metrics");
                Err(e.into())
            }
            Err(_) => Err(ApplicationError::timeout(format!(
                "metrics query exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::CarrierMetrics;
    use crate::domain::entities::{Offer, Quote};
    use crate::infrastructure::persistence::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Repository answering `get_metrics` with a canned response and
    /// remembering the bound it was asked for.
    #[derive(Debug)]
    struct CannedRepository {
        response: RepositoryResult<MetricsResponse>,
        seen: Mutex<Vec<Option<NonZeroU64>>>,
        delay_ms: u64,
    }

    impl CannedRepository {
        fn ok(response: MetricsResponse) -> Self {
            Self {
                response: Ok(response),
                seen: Mutex::new(Vec::new()),
                delay_ms: 0,
            }
        }
    }

    #[async_trait]
    impl QuoteRepository for CannedRepository {
        async fn create_quote(&self, _quote: &Quote) -> RepositoryResult<()> {
            Ok(())
        }

        async fn create_offer(&self, _offer: &Offer) -> RepositoryResult<()> {
            Ok(())
        }

        async fn get_metrics(
            &self,
            last_quotes: Option<NonZeroU64>,
        ) -> RepositoryResult<MetricsResponse> {
            self.seen.lock().unwrap().push(last_quotes);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match &self.response {
                Ok(m) => Ok(m.clone()),
                Err(e) => Err(RepositoryError::query(e.to_string())),
            }
        }
    }

    fn canned() -> MetricsResponse {
        MetricsResponse {
            by_carrier: vec![CarrierMetrics {
                carrier_name: "Correios".into(),
                total_quotes: 2,
                total_freight: 41.98,
                average_freight: 20.99,
            }],
            cheapest: 17.0,
            most_expensive: 20.99,
        }
    }

    #[test]
    fn parse_accepts_positive_integers_and_empty() {
        assert_eq!(parse_last_quotes("").unwrap(), None);
        assert_eq!(parse_last_quotes("5").unwrap(), NonZeroU64::new(5));
    }

    #[test]
    fn parse_rejects_everything_else() {
        for raw in ["-1", "0", "abc", "1.5", " 5", "99999999999999999999999"] {
            let err = parse_last_quotes(raw).unwrap_err();
            assert!(
                matches!(err, ApplicationError::InvalidParameter { name: "last_quotes", .. }),
                "{raw} accepted"
            );
        }
    }

    #[tokio::test]
    async fn returns_repository_metrics_unchanged() {
        let repo = Arc::new(CannedRepository::ok(canned()));
        let service = MetricsService::new(repo.clone());

        let metrics = tokio_test::assert_ok!(service.get_metrics(Some("5")).await);
        assert_eq!(metrics, canned());
        assert_eq!(metrics.by_carrier[0].average_freight, 20.99);
        assert_eq!(metrics.most_expensive, 20.99);
        assert_eq!(repo.seen.lock().unwrap().as_slice(), [NonZeroU64::new(5)]);
    }

    #[tokio::test]
    async fn absent_parameter_means_unbounded() {
        let repo = Arc::new(CannedRepository::ok(MetricsResponse::default()));
        let service = MetricsService::new(repo.clone());

        service.get_metrics(None).await.unwrap();
        service.get_metrics(Some("")).await.unwrap();
        assert_eq!(repo.seen.lock().unwrap().as_slice(), [None, None]);
    }

    #[tokio::test]
    async fn invalid_parameter_skips_repository() {
        let repo = Arc::new(CannedRepository::ok(canned()));
        let service = MetricsService::new(repo.clone());

        let err = service.get_metrics(Some("0")).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(repo.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repository_failure_is_persistence_error() {
        let repo = CannedRepository {
            response: Err(RepositoryError::connection("down")),
            seen: Mutex::new(Vec::new()),
            delay_ms: 0,
        };
        let service = MetricsService::new(Arc::new(repo));

        let err = service.get_metrics(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Persistence(_)));
    }

    #[tokio::test]
    async fn slow_repository_times_out() {
        let repo = CannedRepository {
            response: Ok(canned()),
            seen: Mutex::new(Vec::new()),
            delay_ms: 500,
        };
        let service =
            MetricsService::new(Arc::new(repo)).with_timeout(Duration::from_millis(20));

        let err = service.get_metrics(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Timeout(_)));
    }

    proptest! {
        #[test]
        fn any_positive_integer_is_accepted(n in 1u64..=u64::MAX) {
            prop_assert_eq!(parse_last_quotes(&n.to_string()).unwrap(), NonZeroU64::new(n));
        }

        #[test]
        fn alphabetic_values_are_rejected(raw in "[a-zA-Z]{1,12}") {
            prop_assert!(parse_last_quotes(&raw).is_err());
        }
    }
}
