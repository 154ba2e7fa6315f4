//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur while running a use case:
//! invalid input, a failing freight provider, a failing store, or a request
//! that ran out of time.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(ValidationErrors)   - Malformed or invalid request body
//! ├── InvalidParameter               - Bad query parameter
//! ├── ExternalService(ProviderError) - Freight provider failure
//! ├── Persistence(RepositoryError)   - Store failure
//! ├── Timeout(String)                - Request deadline exceeded
//! └── Internal(String)               - Anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use freight_quote::application::error::ApplicationError;
//! use freight_quote::infrastructure::provider::ProviderError;
//!
//! let err = ApplicationError::invalid_parameter("last_quotes", "must be positive");
//! assert!(err.is_client_error());
//!
//! let err: ApplicationError = ProviderError::status(500, "boom").into();
//! assert!(!err.is_client_error());
//! ```

use crate::application::validation::ValidationErrors;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::provider::ProviderError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request body failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// A query parameter could not be accepted.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong.
        message: String,
    },

    /// The freight provider failed.
    #[error("external service error: {0}")]
    ExternalService(#[from] ProviderError),

    /// The store failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// The request did not complete within its deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a timeout, including a provider timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::ExternalService(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if the caller is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidParameter { .. })
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_from_errors() {
        let err: ApplicationError = ValidationErrors::malformed_body().into();
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert!(err.is_client_error());
        assert!(err.to_string().contains("validation"));
    }

    #[test]
    fn invalid_parameter_names_the_parameter() {
        let err = ApplicationError::invalid_parameter("last_quotes", "not a number");
        assert!(err.is_client_error());
        assert!(err.to_string().contains("last_quotes"));
    }

    #[test]
    fn provider_errors_are_server_side() {
        let err: ApplicationError = ProviderError::status(401, "unauthorized").into();
        assert!(!err.is_client_error());
        assert!(!err.is_timeout());

        let err: ApplicationError = ProviderError::timeout("slow", 10_000).into();
        assert!(err.is_timeout());
    }

    #[test]
    fn repository_errors_convert() {
        let err: ApplicationError = RepositoryError::connection("refused").into();
        assert!(matches!(err, ApplicationError::Persistence(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn timeout_and_internal() {
        assert!(ApplicationError::timeout("15000ms").is_timeout());
        let err = ApplicationError::internal("oops");
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("internal"));
    }
}
