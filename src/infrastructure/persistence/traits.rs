//! # Repository Traits
//!
//! Port definition for quote persistence.
//!
//! The [`QuoteRepository`] trait abstracts where quotes and offers live and
//! how metrics are aggregated over them. Implementations: PostgreSQL for
//! production, in-memory for tests and local runs.
//!
//! # Examples
//!
//! ```ignore
//! use freight_quote::infrastructure::persistence::traits::QuoteRepository;
//!
//! async fn report(repo: &impl QuoteRepository) {
//!     let metrics = repo.get_metrics(None).await.unwrap();
//!     println!("{} carriers seen", metrics.by_carrier.len());
//! }
//! ```

use crate::domain::MetricsResponse;
use crate::domain::entities::{Offer, Quote};
use async_trait::async_trait;
use std::fmt;
use std::num::NonZeroU64;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Referenced entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for quotes, their offers and the metrics derived from them.
///
/// Writes are individual: there is no transaction spanning a quote and its
/// offers, so an interrupted sequence can leave a quote with fewer offers
/// than were simulated.
#[async_trait]
pub trait QuoteRepository: Send + Sync + fmt::Debug {
    /// Stores a new quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the ID already exists, or a
    /// connection/query error from the backend.
    async fn create_quote(&self, quote: &Quote) -> RepositoryResult<()>;

    /// Stores a new offer under an existing quote.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owning quote does not
    /// exist, `RepositoryError::Duplicate` if the ID already exists, or a
    /// connection/query error from the backend.
    async fn create_offer(&self, offer: &Offer) -> RepositoryResult<()>;

    /// Aggregates offer prices over the `last_quotes` most recent quotes,
    /// or over every quote when `None`.
    ///
    /// Carriers are ordered by name; an empty population yields zeroes.
    ///
    /// # Errors
    ///
    /// Returns a connection/query error from the backend.
    async fn get_metrics(&self, last_quotes: Option<NonZeroU64>)
    -> RepositoryResult<MetricsResponse>;
}
