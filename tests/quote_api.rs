//! End-to-end tests of the HTTP API against a mocked Frete Rápido server
//! and the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use freight_quote::api::rest::{AppState, create_router};
use freight_quote::application::services::{MetricsService, QuoteService};
use freight_quote::infrastructure::config::ProviderConfig;
use freight_quote::infrastructure::persistence::in_memory::InMemoryQuoteRepository;
use freight_quote::infrastructure::provider::FreteRapidoClient;
use freight_quote::infrastructure::provider::frete_rapido::SIMULATE_PATH;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_string(),
        token: "token".to_string(),
        platform_code: "platform".to_string(),
        shipper_cnpj: "25438296000158".to_string(),
        dispatcher_zipcode: "29161376".to_string(),
        timeout_ms: 2_000,
    }
}

fn app(server: &MockServer, repo: &InMemoryQuoteRepository, timeout: Duration) -> Router {
    let provider = FreteRapidoClient::new(&provider_config(&server.uri())).unwrap();
    let quote_service =
        QuoteService::new(Arc::new(repo.clone()), Arc::new(provider)).with_timeout(timeout);
    let metrics_service = MetricsService::new(Arc::new(repo.clone())).with_timeout(timeout);
    create_router(AppState::new(quote_service, metrics_service))
}

fn quote_body(zipcode: &str) -> Value {
    json!({
        "recipient": {"address": {"zipcode": zipcode}},
        "volumes": [{
            "category": 7,
            "amount": 1,
            "unitary_weight": 5,
            "price": 349,
            "sku": "abc-teste-123",
            "height": 0.2,
            "width": 0.2,
            "length": 0.2
        }]
    })
}

fn two_offer_answer() -> Value {
    json!({
        "dispatchers": [
            {"offers": [
                {"carrier": {"name": "Correios", "service": "SEDEX"},
                 "delivery_time": {"days": 1}, "final_price": 20.99}
            ]},
            {"offers": [
                {"carrier": {"name": "EXPRESSO FR", "service": "Rodoviário"},
                 "delivery_time": {"days": 3}, "final_price": 17.0}
            ]}
        ]
    })
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_quote(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn quote_flattens_dispatchers_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SIMULATE_PATH))
        .and(body_partial_json(json!({
            "shipper": {"registered_number": "25438296000158", "token": "token"},
            "recipient": {"type": 0, "country": "BRA", "zipcode": 1311000},
            "dispatchers": [{"zipcode": 29161376}],
            "simulation_type": [0]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_offer_answer()))
        .expect(1)
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let (status, body) = send(
        app(&server, &repo, Duration::from_secs(5)),
        post_quote(&quote_body("01311000")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"carrier": [
            {"name": "Correios", "service": "SEDEX", "deadline": "1", "price": 20.99},
            {"name": "EXPRESSO FR", "service": "Rodoviário", "deadline": "3", "price": 17.0}
        ]})
    );

    let quotes = repo.quotes().await;
    assert_eq!(quotes.len(), 1);
    let offers = repo.offers_for(quotes[0].id()).await;
    assert_eq!(offers.len(), 2);
    assert_eq!(offers[1].carrier_name(), "EXPRESSO FR");
}

#[tokio::test]
async fn empty_simulation_returns_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"dispatchers": []})))
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let (status, body) = send(
        app(&server, &repo, Duration::from_secs(5)),
        post_quote(&quote_body("01311000")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"carrier": []}));
    assert_eq!(repo.quote_count().await, 0);
}

#[tokio::test]
async fn invalid_body_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_offer_answer()))
        .expect(0)
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let (status, body) = send(
        app(&server, &repo, Duration::from_secs(5)),
        post_quote(&quote_body("0131100X")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dados de entrada inválidos");
    assert!(body["details"][0].as_str().unwrap().contains("zipcode"));
    assert_eq!(repo.quote_count().await, 0);
}

#[tokio::test]
async fn provider_error_status_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let (status, _) = send(
        app(&server, &repo, Duration::from_secs(5)),
        post_quote(&quote_body("01311000")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(repo.quote_count().await, 0);
}

#[tokio::test]
async fn slow_provider_hits_request_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(two_offer_answer())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let (status, _) = send(
        app(&server, &repo, Duration::from_millis(50)),
        post_quote(&quote_body("01311000")),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(repo.quote_count().await, 0);
}

#[tokio::test]
async fn metrics_reflect_stored_quotes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_offer_answer()))
        .mount(&server)
        .await;

    let repo = InMemoryQuoteRepository::new();
    let router = app(&server, &repo, Duration::from_secs(5));
    for _ in 0..2 {
        let (status, _) = send(router.clone(), post_quote(&quote_body("01311000"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(router.clone(), get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "by_carrier": [
                {"carrier_name": "Correios", "total_quotes": 2,
                 "total_freight": 41.98, "average_freight": 20.99},
                {"carrier_name": "EXPRESSO FR", "total_quotes": 2,
                 "total_freight": 34.0, "average_freight": 17.0}
            ],
            "cheapest_overall": 17.0,
            "most_expensive_overall": 20.99
        })
    );

    let (status, body) = send(router.clone(), get("/metrics?last_quotes=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["by_carrier"][0]["total_quotes"], 1);

    let (status, body) = send(router, get("/metrics?last_quotes=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("last_quotes"));
}
