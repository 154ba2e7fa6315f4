//! # Zipcode Value Object
//!
//! Brazilian postal code (CEP): exactly eight ASCII digits.
//!
//! # Examples
//!
//! ```
//! use freight_quote::domain::value_objects::Zipcode;
//!
//! let cep = Zipcode::parse("01311000").unwrap();
//! assert_eq!(cep.as_str(), "01311000");
//! assert_eq!(cep.as_number(), 1_311_000);
//!
//! assert!(Zipcode::parse("01311").is_err());
//! assert!(Zipcode::parse("01311abc").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a CEP.
pub const ZIPCODE_LEN: usize = 8;

/// A validated eight-digit postal code.
///
/// Leading zeros are preserved in the string form; the numeric form drops
/// them, which is what the freight provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zipcode(String);

impl Zipcode {
    /// Parses a postal code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidZipcodeLength` if the input is not
    /// exactly eight characters long, and `DomainError::NonNumericZipcode`
    /// if any character is not an ASCII digit.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.chars().count() != ZIPCODE_LEN {
            return Err(DomainError::InvalidZipcodeLength(raw.to_string()));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::NonNumericZipcode(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the eight-digit string form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of the code.
    #[must_use]
    pub fn as_number(&self) -> u32 {
        // eight ASCII digits always fit in a u32
        self.0
            .bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    }
}

impl fmt::Display for Zipcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Zipcode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Zipcode> for String {
    fn from(zipcode: Zipcode) -> Self {
        zipcode.0
    }
}
