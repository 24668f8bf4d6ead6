//! Currency and exchange rate error types.

use chrono::NaiveDate;
use ifrs_shared::types::Currency;
use thiserror::Error;

/// Errors that can occur during currency operations.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// No exchange rate found for the currency pair on the given date.
    #[error("No exchange rate found for {from} to {to} on {date}")]
    NoExchangeRate {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
        /// Date for which the rate was requested.
        date: NaiveDate,
    },

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    InvalidExchangeRate,

    /// Rate validity window is inverted.
    #[error("Exchange rate valid_from {valid_from} is after valid_to {valid_to}")]
    InvalidValidityWindow {
        /// Start of the validity window.
        valid_from: NaiveDate,
        /// End of the validity window.
        valid_to: NaiveDate,
    },

    /// Source and target currencies must be different.
    #[error("Source and target currencies must be different")]
    SameCurrencyExchange,
}

impl CurrencyError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoExchangeRate { .. } => "NO_EXCHANGE_RATE",
            Self::InvalidExchangeRate => "INVALID_EXCHANGE_RATE",
            Self::InvalidValidityWindow { .. } => "INVALID_VALIDITY_WINDOW",
            Self::SameCurrencyExchange => "SAME_CURRENCY_EXCHANGE",
        }
    }
}

impl From<CurrencyError> for ifrs_shared::AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::NoExchangeRate { .. } => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
