//! The append-only journal.
//!
//! The journal owns every posted ledger row for one entity. Rows are
//! committed in balanced batches, chained by content hash, and never
//! mutated or removed. Corrections happen by posting reversing rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use ifrs_shared::types::{AccountId, Currency, EntityId, LedgerId, LineItemId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntryType, Ledger};
use super::error::LedgerError;
use super::hash::{chain_hash, GENESIS_HASH};

/// A ledger row awaiting commit. Identifiers and hashes are assigned by
/// the journal.
#[derive(Debug, Clone)]
pub struct LedgerDraft {
    /// Transaction the row was generated from.
    pub transaction_id: TransactionId,
    /// Line item the row was generated from, if any.
    pub line_item_id: Option<LineItemId>,
    /// Posting date.
    pub post_date: NaiveDate,
    /// Account the row posts against.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Transaction currency.
    pub currency: Currency,
    /// Rate to the functional currency.
    pub rate: Decimal,
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// Amount in the functional currency.
    pub functional_amount: Decimal,
}

/// Append-only store of ledger rows for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    entity_id: EntityId,
    entries: Vec<Ledger>,
    by_account: HashMap<AccountId, Vec<usize>>,
    by_transaction: HashMap<TransactionId, Vec<usize>>,
    versions: HashMap<AccountId, u64>,
    last_hash: String,
}

impl Journal {
    /// Creates an empty journal for the entity.
    #[must_use]
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            entries: Vec::new(),
            by_account: HashMap::new(),
            by_transaction: HashMap::new(),
            versions: HashMap::new(),
            last_hash: GENESIS_HASH.to_string(),
        }
    }

    /// The entity this journal belongs to.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Validates a batch without committing it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyBatch`, `NonPositiveAmount`, or `UnbalancedPosting`.
    pub fn validate(batch: &[LedgerDraft]) -> Result<(), LedgerError> {
        if batch.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for draft in batch {
            if draft.amount <= Decimal::ZERO || draft.functional_amount <= Decimal::ZERO {
                return Err(LedgerError::NonPositiveAmount(draft.amount));
            }
            match draft.entry_type {
                EntryType::Debit => debits += draft.functional_amount,
                EntryType::Credit => credits += draft.functional_amount,
            }
        }
        if debits != credits {
            return Err(LedgerError::UnbalancedPosting { debits, credits });
        }
        Ok(())
    }

    /// Commits a balanced batch of rows, extending the hash chain.
    ///
    /// The batch is validated up front; on error nothing is appended.
    ///
    /// # Errors
    ///
    /// Returns `EmptyBatch`, `NonPositiveAmount`, or `UnbalancedPosting`.
    pub fn commit(&mut self, batch: Vec<LedgerDraft>) -> Result<Vec<LedgerId>, LedgerError> {
        Self::validate(&batch)?;

        let mut ids = Vec::with_capacity(batch.len());
        for draft in batch {
            let mut row = Ledger {
                id: LedgerId::new(),
                entity_id: self.entity_id,
                transaction_id: draft.transaction_id,
                line_item_id: draft.line_item_id,
                post_date: draft.post_date,
                account_id: draft.account_id,
                entry_type: draft.entry_type,
                currency: draft.currency,
                rate: draft.rate,
                amount: draft.amount,
                functional_amount: draft.functional_amount,
                hash: String::new(),
            };
            row.hash = chain_hash(&row, &self.last_hash);
            self.last_hash.clone_from(&row.hash);

            let index = self.entries.len();
            self.by_account.entry(row.account_id).or_default().push(index);
            self.by_transaction
                .entry(row.transaction_id)
                .or_default()
                .push(index);
            *self.versions.entry(row.account_id).or_insert(0) += 1;
            ids.push(row.id);
            self.entries.push(row);
        }
        Ok(ids)
    }

    /// Checks the expected version of an account before a guarded commit.
    ///
    /// # Errors
    ///
    /// Returns `AccountVersionMismatch` if another posting touched the
    /// account since the caller read it.
    pub fn check_version(&self, account_id: AccountId, expected: u64) -> Result<(), LedgerError> {
        let actual = self.account_version(account_id);
        if actual != expected {
            return Err(LedgerError::AccountVersionMismatch {
                account_id,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Number of postings that have touched the account.
    #[must_use]
    pub fn account_version(&self, account_id: AccountId) -> u64 {
        self.versions.get(&account_id).copied().unwrap_or(0)
    }

    /// All rows in posting order.
    pub fn entries(&self) -> impl Iterator<Item = &Ledger> {
        self.entries.iter()
    }

    /// Rows posted against the account, in posting order.
    pub fn entries_for_account(&self, account_id: AccountId) -> impl Iterator<Item = &Ledger> {
        self.by_account
            .get(&account_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// Rows generated by the transaction, in posting order.
    pub fn entries_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> impl Iterator<Item = &Ledger> {
        self.by_transaction
            .get(&transaction_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// Returns true if any row has posted against the account.
    #[must_use]
    pub fn has_entries(&self, account_id: AccountId) -> bool {
        self.by_account
            .get(&account_id)
            .map_or(false, |rows| !rows.is_empty())
    }

    /// Functional debit and credit totals for an account over a date
    /// window (inclusive on both ends; `None` leaves that end open).
    #[must_use]
    pub fn totals_for_account(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> (Decimal, Decimal) {
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for row in self.entries_for_account(account_id) {
            if from.map_or(false, |f| row.post_date < f) {
                continue;
            }
            if to.map_or(false, |t| row.post_date > t) {
                continue;
            }
            match row.entry_type {
                EntryType::Debit => debits += row.functional_amount,
                EntryType::Credit => credits += row.functional_amount,
            }
        }
        (debits, credits)
    }

    /// Number of rows in the journal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the journal has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of the most recent row, or the genesis hash.
    #[must_use]
    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    /// Walks the full hash chain, recomputing every digest.
    ///
    /// # Errors
    ///
    /// Returns `HashChainCorrupted` with the index of the first row whose
    /// stored hash no longer matches its content.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let mut previous = GENESIS_HASH.to_string();
        for (index, row) in self.entries.iter().enumerate() {
            let expected = chain_hash(row, &previous);
            if row.hash != expected {
                return Err(LedgerError::HashChainCorrupted { index });
            }
            previous.clone_from(&row.hash);
        }
        Ok(())
    }
}
