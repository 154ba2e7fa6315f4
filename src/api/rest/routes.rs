//! # REST Routes
//!
//! Router assembly.

use crate::api::rest::handlers::{AppState, create_quote, get_metrics, health};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the router with every endpoint and request tracing.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quote", post(create_quote))
        .route("/metrics", get(get_metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::quote_service::tests::{
        StubProvider, provider_offer, sample_request,
    };
    use crate::application::services::{MetricsService, QuoteService};
    use crate::domain::entities::{Offer, Quote};
    use crate::domain::value_objects::Zipcode;
    use crate::infrastructure::persistence::QuoteRepository;
    use crate::infrastructure::persistence::in_memory::InMemoryQuoteRepository;
    use crate::infrastructure::provider::ProviderError;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router(repo: &InMemoryQuoteRepository, provider: StubProvider) -> Router {
        let quote_service = QuoteService::new(Arc::new(repo.clone()), Arc::new(provider));
        let metrics_service = MetricsService::new(Arc::new(repo.clone()));
        create_router(AppState::new(quote_service, metrics_service))
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/quote")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn quote_returns_offers_and_stores_them() {
        let repo = InMemoryQuoteRepository::new();
        let provider = StubProvider::offers(vec![
            provider_offer("Correios", "SEDEX", 1, 20.99),
            provider_offer("Correios", "PAC", 5, 17.0),
        ]);
        let body = serde_json::to_vec(&sample_request()).unwrap();

        let (status, json) = send(router(&repo, provider), post_json(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"carrier": [
                {"name": "Correios", "service": "SEDEX", "deadline": "1", "price": 20.99},
                {"name": "Correios", "service": "PAC", "deadline": "5", "price": 17.0}
            ]})
        );
        assert_eq!(repo.quote_count().await, 1);
        assert_eq!(repo.offer_count().await, 2);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let repo = InMemoryQuoteRepository::new();
        let (status, json) = send(
            router(&repo, StubProvider::offers(vec![])),
            post_json("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Dados de entrada inválidos");
        assert!(json["details"][0].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn missing_zipcode_names_the_field() {
        let repo = InMemoryQuoteRepository::new();
        let body = json!({
            "recipient": {"address": {}},
            "volumes": [{"category": 7, "amount": 1, "unitary_weight": 5,
                         "price": 349, "height": 0.2, "width": 0.2, "length": 0.2}]
        });
        let (status, json) = send(
            router(&repo, StubProvider::offers(vec![])),
            post_json(body.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["details"][0].as_str().unwrap().contains("zipcode"));
        assert_eq!(repo.quote_count().await, 0);
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let repo = InMemoryQuoteRepository::new();
        let body = serde_json::to_vec(&sample_request()).unwrap();
        let (status, json) = send(
            router(&repo, StubProvider::failing(ProviderError::status(500, "down"))),
            post_json(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn metrics_rejects_bad_bound() {
        let repo = InMemoryQuoteRepository::new();
        for bound in ["-1", "0", "abc", "1.5"] {
            let (status, json) = send(
                router(&repo, StubProvider::offers(vec![])),
                get(&format!("/metrics?last_quotes={bound}")),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{bound}");
            assert!(json["error"].as_str().unwrap().contains("last_quotes"));
        }
    }

    #[tokio::test]
    async fn repeated_last_quotes_uses_first_value() {
        let repo = InMemoryQuoteRepository::new();
        for carrier in ["Older", "Newer"] {
            let quote = Quote::new(Zipcode::parse("01311000").unwrap());
            repo.create_quote(&quote).await.unwrap();
            let offer = Offer::new(quote.id(), carrier, "svc", 1, Decimal::new(1_000, 2)).unwrap();
            repo.create_offer(&offer).await.unwrap();
        }

        let (status, json) = send(
            router(&repo, StubProvider::offers(vec![])),
            get("/metrics?last_quotes=1&last_quotes=2"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["by_carrier"].as_array().unwrap().len(), 1);
        assert_eq!(json["by_carrier"][0]["carrier_name"], "Newer");
    }

    #[tokio::test]
    async fn non_utf8_last_quotes_is_structured_bad_request() {
        let repo = InMemoryQuoteRepository::new();
        let (status, json) = send(
            router(&repo, StubProvider::offers(vec![])),
            get("/metrics?last_quotes=%FF"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("last_quotes"));
    }

    #[tokio::test]
    async fn metrics_on_empty_store() {
        let repo = InMemoryQuoteRepository::new();
        let (status, json) = send(
            router(&repo, StubProvider::offers(vec![])),
            get("/metrics"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"by_carrier": [], "cheapest_overall": 0.0, "most_expensive_overall": 0.0})
        );
    }

    #[tokio::test]
    async fn health_reports_version() {
        let repo = InMemoryQuoteRepository::new();
        let (status, json) = send(router(&repo, StubProvider::offers(vec![])), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
