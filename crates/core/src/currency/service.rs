//! Currency conversion.
//!
//! All conversions use Banker's Rounding (round half to even) so repeated
//! conversions do not drift in one direction. Ledger rows store both the
//! original and the converted amount.

use rust_decimal::{Decimal, RoundingStrategy};

/// Stateless conversion helper.
pub struct CurrencyService;

impl CurrencyService {
    /// Converts an amount at the given rate, rounded to the given number
    /// of decimal places.
    #[must_use]
    pub fn convert_with_precision(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
        (amount * rate).round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }

    /// Rounds a value half to even.
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }
}
