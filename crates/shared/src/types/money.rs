//! Currency code type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an invalid ISO 4217 currency code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid currency code: {0}")]
pub struct InvalidCurrencyCode(pub String);

/// ISO 4217 currency code.
///
/// Codes are stored uppercase; construction validates the three-letter form
/// so a `Currency` is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Creates a currency from a three-letter ISO 4217 code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyCode` if the code is not three ASCII letters.
    pub fn new(code: &str) -> Result<Self, InvalidCurrencyCode> {
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(InvalidCurrencyCode(code.to_string()))
        }
    }

    /// Returns the currency code as a string slice.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Currency {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
