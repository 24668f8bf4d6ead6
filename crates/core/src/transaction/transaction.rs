//! The transaction aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use ifrs_shared::types::{AccountId, Currency, EntityId, LineItemId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use super::line_item::LineItem;
use super::types::TransactionType;

/// A dated, typed economic event with one main account and one or more
/// line items.
///
/// Transactions are drafts until posted; posting freezes every core field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Entity this transaction belongs to.
    pub entity_id: EntityId,
    /// Transaction subtype.
    pub transaction_type: TransactionType,
    /// Transaction date.
    pub date: NaiveDate,
    /// The main account.
    pub account_id: AccountId,
    /// Transaction currency.
    pub currency: Currency,
    /// Rate from the transaction currency to the functional currency.
    pub exchange_rate: Decimal,
    /// Reference number (e.g., "IN0001/2026").
    pub reference: String,
    /// Narration.
    pub narration: String,
    /// Whether the main account is credited (line items take the other
    /// side).
    pub credited: bool,
    /// Line items.
    pub line_items: Vec<LineItem>,
    /// Whether the transaction has been posted to the ledger.
    pub posted: bool,
    /// Soft-delete marker; deleted transactions are recoverable.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Creates an unposted transaction with the subtype's default main
    /// account side.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_id: EntityId,
        transaction_type: TransactionType,
        date: NaiveDate,
        account_id: AccountId,
        currency: Currency,
        exchange_rate: Decimal,
        reference: impl Into<String>,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            entity_id,
            transaction_type,
            date,
            account_id,
            currency,
            exchange_rate,
            reference: reference.into(),
            narration: narration.into(),
            credited: transaction_type.main_account_credited(),
            line_items: Vec::new(),
            posted: false,
            deleted_at: None,
        }
    }

    /// Fails with `PostedTransaction` once the transaction has posted.
    fn ensure_unposted(&self) -> Result<(), TransactionError> {
        if self.posted {
            return Err(TransactionError::PostedTransaction(self.id));
        }
        Ok(())
    }

    /// Adds a line item.
    ///
    /// # Errors
    ///
    /// Returns `PostedTransaction` after posting, or `MainAccountLineItem`
    /// if the line uses the transaction's main account.
    pub fn add_line_item(&mut self, line_item: LineItem) -> Result<LineItemId, TransactionError> {
        self.ensure_unposted()?;
        if line_item.account_id == self.account_id {
            return Err(TransactionError::MainAccountLineItem(line_item.account_id));
        }
        let id = line_item.id;
        self.line_items.push(line_item);
        Ok(id)
    }

    /// Removes a line item.
    ///
    /// # Errors
    ///
    /// Returns `PostedTransaction` after posting, or `LineItemNotFound`.
    pub fn remove_line_item(&mut self, id: LineItemId) -> Result<LineItem, TransactionError> {
        self.ensure_unposted()?;
        let index = self
            .line_items
            .iter()
            .position(|li| li.id == id)
            .ok_or(TransactionError::LineItemNotFound(id))?;
        Ok(self.line_items.remove(index))
    }

    /// Changes the transaction date.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), TransactionError> {
        self.ensure_unposted()?;
        self.date = date;
        Ok(())
    }

    /// Changes the main account.
    pub fn set_account(&mut self, account_id: AccountId) -> Result<(), TransactionError> {
        self.ensure_unposted()?;
        self.account_id = account_id;
        Ok(())
    }

    /// Changes the exchange rate.
    pub fn set_exchange_rate(&mut self, rate: Decimal) -> Result<(), TransactionError> {
        self.ensure_unposted()?;
        self.exchange_rate = rate;
        Ok(())
    }

    /// Changes the narration.
    pub fn set_narration(&mut self, narration: impl Into<String>) -> Result<(), TransactionError> {
        self.ensure_unposted()?;
        self.narration = narration.into();
        Ok(())
    }

    /// Chooses the main account side.
    ///
    /// Only journal entries may flip sides; every other subtype has a
    /// fixed direction.
    ///
    /// # Errors
    ///
    /// Returns `DirectionFixed` for non-journal types, or
    /// `PostedTransaction` after posting.
    pub fn set_credited(&mut self, credited: bool) -> Result<(), TransactionError> {
        self.ensure_unposted()?;
        if self.transaction_type != TransactionType::JournalEntry {
            return Err(TransactionError::DirectionFixed(self.transaction_type));
        }
        self.credited = credited;
        Ok(())
    }

    /// Total gross amount of the transaction (transaction currency).
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.line_items.iter().map(LineItem::gross_amount).sum()
    }

    /// Returns true if this transaction can be cleared by others.
    #[must_use]
    pub fn is_clearable(&self) -> bool {
        self.transaction_type.is_clearable() && self.posted
    }

    /// Returns true if this transaction can clear others.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        self.transaction_type.is_assignable() && self.posted
    }

    /// Soft-deletes the transaction.
    ///
    /// # Errors
    ///
    /// Returns `CannotDeletePosted` for posted transactions.
    pub fn soft_delete(&mut self) -> Result<(), TransactionError> {
        if self.posted {
            return Err(TransactionError::CannotDeletePosted(self.id));
        }
        self.deleted_at = Some(Utc::now());
        Ok(())
    }

    /// Restores a soft-deleted transaction.
    pub fn restore(&mut self) {
        self.deleted_at = None;
    }

    /// Marks the transaction posted. Called by the posting engine only.
    pub(crate) fn mark_posted(&mut self) {
        self.posted = true;
    }
}
