//! Opening balances carried into a reporting period.

use chrono::NaiveDate;
use ifrs_shared::types::{AccountId, BalanceId, Currency, EntityId, ReportingPeriodId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PeriodError;
use super::period::ReportingPeriod;
use crate::currency::CurrencyService;
use crate::ledger::EntryType;

/// An opening balance for one account in one reporting period.
///
/// Opening balances stand in for transactions posted before the books
/// were brought onto the system, so their dates must precede the period
/// they open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// Unique identifier.
    pub id: BalanceId,
    /// Entity this balance belongs to.
    pub entity_id: EntityId,
    /// Account the balance opens.
    pub account_id: AccountId,
    /// Period the balance feeds into.
    pub reporting_period_id: ReportingPeriodId,
    /// Date of the originating transaction.
    pub transaction_date: NaiveDate,
    /// Balance currency.
    pub currency: Currency,
    /// Rate to the functional currency.
    pub exchange_rate: Decimal,
    /// Amount in the balance currency (strictly positive).
    pub amount: Decimal,
    /// Side the balance sits on.
    pub side: EntryType,
}

impl Balance {
    /// Amount in the functional currency, rounded to four places.
    #[must_use]
    pub fn functional_amount(&self) -> Decimal {
        CurrencyService::round(self.amount * self.exchange_rate, 4)
    }

    /// Functional amount signed by side: debits positive, credits
    /// negative.
    #[must_use]
    pub fn signed_functional_amount(&self) -> Decimal {
        match self.side {
            EntryType::Debit => self.functional_amount(),
            EntryType::Credit => -self.functional_amount(),
        }
    }
}

/// Opening balances for one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningBalances {
    balances: Vec<Balance>,
}

impl OpeningBalances {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an opening balance against a reporting period.
    ///
    /// # Errors
    ///
    /// Returns `NegativeBalanceAmount` for non-positive amounts, or
    /// `InvalidBalanceDate` if the transaction date does not precede the
    /// period start.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        period: &ReportingPeriod,
        account_id: AccountId,
        transaction_date: NaiveDate,
        currency: Currency,
        exchange_rate: Decimal,
        amount: Decimal,
        side: EntryType,
    ) -> Result<BalanceId, PeriodError> {
        if amount <= Decimal::ZERO {
            return Err(PeriodError::NegativeBalanceAmount);
        }
        if transaction_date >= period.start_date {
            return Err(PeriodError::InvalidBalanceDate {
                date: transaction_date,
                period_start: period.start_date,
            });
        }

        let balance = Balance {
            id: BalanceId::new(),
            entity_id: period.entity_id,
            account_id,
            reporting_period_id: period.id,
            transaction_date,
            currency,
            exchange_rate,
            amount,
            side,
        };
        let id = balance.id;
        self.balances.push(balance);
        Ok(id)
    }

    /// Opening balances for an account.
    pub fn for_account(&self, account_id: AccountId) -> impl Iterator<Item = &Balance> {
        self.balances
            .iter()
            .filter(move |b| b.account_id == account_id)
    }

    /// Net functional opening balance of an account (debits minus
    /// credits).
    #[must_use]
    pub fn net_for_account(&self, account_id: AccountId) -> Decimal {
        self.for_account(account_id)
            .map(Balance::signed_functional_amount)
            .sum()
    }

    /// All opening balances.
    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.balances.iter()
    }
}
