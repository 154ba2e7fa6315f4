//! # Persistence Layer
//!
//! Repository port and its implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`QuoteRepository`]: quotes, offers and metrics aggregation
//!
//! ## Implementations
//!
//! - `in_memory`: in-memory implementation for tests and local runs
//! - `postgres`: PostgreSQL implementation and schema bootstrap

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{QuoteRepository, RepositoryError, RepositoryResult};
