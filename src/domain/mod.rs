//! # Domain Layer
//!
//! Entities, value objects and the metrics read model. No I/O.

pub mod entities;
pub mod errors;
pub mod metrics;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
pub use metrics::{CarrierMetrics, MetricsResponse};
