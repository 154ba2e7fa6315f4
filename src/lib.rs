//! # Freight Quote
//!
//! HTTP service that quotes freight for a shipment through the Frete Rápido
//! simulation API, stores every returned offer in PostgreSQL and reports
//! per-carrier price metrics over recent quotes.
//!
//! # Layers
//!
//! - [`domain`]: entities, value objects and metrics types
//! - [`application`]: request validation, quote orchestration, metrics
//! - [`infrastructure`]: configuration, provider client, persistence, tracing
//! - [`api`]: axum router and handlers

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
