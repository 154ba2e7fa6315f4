//! # Domain Errors
//!
//! Business-rule violations raised while constructing domain values.

use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Postal code is not exactly eight characters.
    #[error("zipcode must have exactly 8 characters: {0:?}")]
    InvalidZipcodeLength(String),

    /// Postal code contains something other than ASCII digits.
    #[error("zipcode must contain only numeric digits: {0:?}")]
    NonNumericZipcode(String),

    /// Price cannot be represented as a non-negative decimal.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_mention_zipcode() {
        assert!(
            DomainError::InvalidZipcodeLength("123".into())
                .to_string()
                .contains("zipcode")
        );
        assert!(
            DomainError::NonNumericZipcode("abc".into())
                .to_string()
                .contains("numeric")
        );
    }
}
