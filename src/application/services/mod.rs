//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`QuoteService`]: validate, simulate, store and return freight offers
//! - [`MetricsService`]: aggregate stored offers per carrier

pub mod metrics_service;
pub mod quote_service;

pub use metrics_service::{MetricsService, parse_last_quotes};
pub use quote_service::QuoteService;
