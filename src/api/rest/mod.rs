//! # REST API
//!
//! HTTP endpoints using axum.
//!
//! # Endpoints
//!
//! - `POST /quote` - Simulate freight for a shipment and store the offers
//! - `GET /metrics?last_quotes=N` - Per-carrier price aggregates
//! - `GET /health` - Liveness check
//!
//! # Usage
//!
//! ```ignore
//! use freight_quote::api::rest::{create_router, AppState};
//!
//! let state = AppState::new(quote_service, metrics_service);
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse, HealthResponse, MetricsParams};
pub use routes::create_router;
