//! Exchange rate types and the per-entity rate table.

use chrono::NaiveDate;
use ifrs_shared::types::{Currency, EntityId, ExchangeRateId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Time-bounded exchange rate between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Unique identifier.
    pub id: ExchangeRateId,
    /// Entity this rate belongs to.
    pub entity_id: EntityId,
    /// Source currency.
    pub from_currency: Currency,
    /// Target currency.
    pub to_currency: Currency,
    /// Exchange rate (1 `from_currency` = rate `to_currency`).
    pub rate: Decimal,
    /// First date (inclusive) this rate applies.
    pub valid_from: NaiveDate,
    /// Last date (inclusive) this rate applies; open-ended when `None`.
    pub valid_to: Option<NaiveDate>,
}

impl ExchangeRate {
    /// Returns true if the rate covers the given date.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_to.map_or(true, |to| date <= to)
    }
}

/// Per-entity table of time-bounded exchange rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    rates: Vec<ExchangeRate>,
}

impl RateTable {
    /// Creates an empty rate table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate to the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not positive, the pair is degenerate,
    /// or the validity window is inverted.
    pub fn add(
        &mut self,
        entity_id: EntityId,
        from_currency: Currency,
        to_currency: Currency,
        rate: Decimal,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> Result<ExchangeRateId, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidExchangeRate);
        }
        if from_currency == to_currency {
            return Err(CurrencyError::SameCurrencyExchange);
        }
        if let Some(to) = valid_to {
            if valid_from > to {
                return Err(CurrencyError::InvalidValidityWindow {
                    valid_from,
                    valid_to: to,
                });
            }
        }

        let id = ExchangeRateId::new();
        self.rates.push(ExchangeRate {
            id,
            entity_id,
            from_currency,
            to_currency,
            rate,
            valid_from,
            valid_to,
        });
        Ok(id)
    }

    /// Looks up the rate for a currency pair on a date.
    ///
    /// The identity pair always resolves to 1. When several windows cover
    /// the date, the most recently starting one wins.
    ///
    /// # Errors
    ///
    /// Returns `NoExchangeRate` if no window covers the date.
    pub fn rate_for(
        &self,
        from: &Currency,
        to: &Currency,
        date: NaiveDate,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.rates
            .iter()
            .filter(|r| &r.from_currency == from && &r.to_currency == to && r.covers(date))
            .max_by_key(|r| r.valid_from)
            .map(|r| r.rate)
            .ok_or_else(|| CurrencyError::NoExchangeRate {
                from: from.clone(),
                to: to.clone(),
                date,
            })
    }
}
