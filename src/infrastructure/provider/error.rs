//! # Provider Errors
//!
//! Error types for calls to the external freight-quoting provider.
//!
//! # Examples
//!
//! ```
//! use freight_quote::infrastructure::provider::error::ProviderError;
//!
//! let error = ProviderError::status(422, r#"{"error":"invalid zipcode"}"#);
//! assert_eq!(error.status_code(), Some(422));
//! assert!(error.to_string().contains("invalid zipcode"));
//! ```

use thiserror::Error;

/// Error type for provider operations.
///
/// Every variant ends up as a `502 Bad Gateway` at the HTTP boundary; the
/// distinction exists for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Request timed out.
    #[error("provider timeout after {timeout_ms}ms: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The request could not be issued or the connection dropped.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Response body did not match the expected structure.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Local failure building the client or the request.
    #[error("provider client error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error for a call bounded by `timeout_ms`.
    #[must_use]
    pub fn timeout(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a non-success status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the provider's status code, if it answered at all.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
