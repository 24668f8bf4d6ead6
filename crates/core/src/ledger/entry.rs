//! Ledger entries: the immutable rows of the journal.

use chrono::NaiveDate;
use ifrs_shared::types::{
    AccountId, Currency, EntityId, LedgerId, LineItemId, TransactionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a double entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntryType {
    /// The opposite side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Picks the side for a main account given its credited flag.
    #[must_use]
    pub const fn for_main_account(credited: bool) -> Self {
        if credited {
            Self::Credit
        } else {
            Self::Debit
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

/// One immutable ledger row.
///
/// Rows are only created by the posting engine and are chained by
/// `hash`, which commits to the row content and the previous row's hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Unique identifier.
    pub id: LedgerId,
    /// Entity the row belongs to.
    pub entity_id: EntityId,
    /// Transaction the row was generated from.
    pub transaction_id: TransactionId,
    /// Line item the row was generated from, if any. VAT rows carry the
    /// line item that charged the tax.
    pub line_item_id: Option<LineItemId>,
    /// Posting date (the transaction date).
    pub post_date: NaiveDate,
    /// Account the row posts against.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Transaction currency.
    pub currency: Currency,
    /// Rate from the transaction currency to the functional currency.
    pub rate: Decimal,
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// Amount in the entity's functional currency.
    pub functional_amount: Decimal,
    /// Chained content hash (hex SHA-256).
    pub hash: String,
}

impl Ledger {
    /// Functional amount signed by entry side: debits positive, credits
    /// negative.
    #[must_use]
    pub fn signed_functional_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.functional_amount,
            EntryType::Credit => -self.functional_amount,
        }
    }
}
