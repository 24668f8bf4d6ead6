//! The posting engine.
//!
//! Turns a validated transaction into balanced ledger rows and commits
//! them atomically: every guard runs before the first row is appended,
//! so a failed posting leaves the journal untouched.

use ifrs_shared::config::PostingConfig;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::entry::EntryType;
use super::error::PostingError;
use super::journal::{Journal, LedgerDraft};
use crate::account::{Account, ChartOfAccounts};
use crate::currency::CurrencyService;
use crate::entity::Entity;
use crate::fiscal::PeriodCalendar;
use crate::transaction::{Transaction, TransactionError};

/// Stateless posting service.
pub struct PostingService;

impl PostingService {
    /// Posts a transaction to the journal.
    ///
    /// Validates the transaction against the reporting calendar and the
    /// chart of accounts, generates one debit/credit pair per line item
    /// (plus a pair for any VAT charge), commits the balanced batch, and
    /// marks the transaction posted.
    ///
    /// # Errors
    ///
    /// Returns a [`PostingError`] naming the first violated rule; the
    /// journal and the transaction are unchanged on error.
    pub fn post(
        entity: &Entity,
        chart: &ChartOfAccounts,
        calendar: &PeriodCalendar,
        config: &PostingConfig,
        journal: &mut Journal,
        transaction: &mut Transaction,
    ) -> Result<(), PostingError> {
        let batch = Self::stage(entity, chart, calendar, config, transaction)?;
        Journal::validate(&batch)?;
        journal.commit(batch)?;
        transaction.mark_posted();
        info!(
            transaction_id = %transaction.id,
            reference = %transaction.reference,
            transaction_type = %transaction.transaction_type,
            "transaction posted"
        );
        Ok(())
    }

    /// Posts with optimistic version guards.
    ///
    /// `expected_versions` carries the journal versions the caller read
    /// for the accounts it is about to touch; if any account has moved
    /// since, the posting is rejected with `AccountVersionMismatch` and
    /// the caller can re-read and retry.
    ///
    /// # Errors
    ///
    /// As [`post`](Self::post), plus `AccountVersionMismatch`.
    pub fn post_guarded(
        entity: &Entity,
        chart: &ChartOfAccounts,
        calendar: &PeriodCalendar,
        config: &PostingConfig,
        journal: &mut Journal,
        transaction: &mut Transaction,
        expected_versions: &[(ifrs_shared::types::AccountId, u64)],
    ) -> Result<(), PostingError> {
        for &(account_id, expected) in expected_versions {
            journal.check_version(account_id, expected)?;
        }
        Self::post(entity, chart, calendar, config, journal, transaction)
    }

    /// Runs every posting guard and builds the ledger batch without
    /// committing it.
    fn stage(
        entity: &Entity,
        chart: &ChartOfAccounts,
        calendar: &PeriodCalendar,
        config: &PostingConfig,
        transaction: &Transaction,
    ) -> Result<Vec<LedgerDraft>, PostingError> {
        if transaction.entity_id != entity.id {
            return Err(PostingError::EntityMismatch {
                transaction_id: transaction.id,
                transaction_entity: transaction.entity_id,
                ledger_entity: entity.id,
            });
        }
        if transaction.posted {
            return Err(TransactionError::PostedTransaction(transaction.id).into());
        }
        if transaction.line_items.is_empty() {
            return Err(TransactionError::MissingLineItem(transaction.id).into());
        }

        calendar
            .period_for(transaction.date)?
            .validate_posting(transaction.transaction_type)?;

        let main_account = Self::resolve(chart, transaction.account_id)?;
        if let Some(allowed) = transaction.transaction_type.main_account_types() {
            if !allowed.contains(&main_account.account_type) {
                return Err(PostingError::InvalidMainAccountType {
                    transaction_type: transaction.transaction_type,
                    account_type: main_account.account_type,
                });
            }
        }

        let main_side = EntryType::for_main_account(transaction.credited);
        let line_side = main_side.flipped();
        let mut batch = Vec::new();

        for line in &transaction.line_items {
            let line_account = Self::resolve(chart, line.account_id)?;
            if let Some(allowed) = transaction.transaction_type.line_item_account_types() {
                if !allowed.contains(&line_account.account_type) {
                    return Err(PostingError::InvalidLineItemAccountType {
                        transaction_type: transaction.transaction_type,
                        account_type: line_account.account_type,
                    });
                }
            }

            let net = line.net_amount();
            if net > Decimal::ZERO {
                batch.push(Self::draft(config, transaction, Some(line.id), main_account.id, main_side, net));
                batch.push(Self::draft(config, transaction, Some(line.id), line_account.id, line_side, net));
            }

            if let Some(vat) = &line.vat {
                let vat_amount = line.vat_amount();
                if vat_amount > Decimal::ZERO {
                    let vat_account_id =
                        vat.account_id
                            .ok_or_else(|| PostingError::MissingVatAccount {
                                vat_code: vat.code.clone(),
                            })?;
                    let vat_account = Self::resolve(chart, vat_account_id)?;
                    batch.push(Self::draft(config, transaction, Some(line.id), main_account.id, main_side, vat_amount));
                    batch.push(Self::draft(config, transaction, Some(line.id), vat_account.id, line_side, vat_amount));
                }
            }
        }

        debug!(
            transaction_id = %transaction.id,
            rows = batch.len(),
            "staged ledger batch"
        );
        Ok(batch)
    }

    fn resolve(
        chart: &ChartOfAccounts,
        id: ifrs_shared::types::AccountId,
    ) -> Result<&Account, PostingError> {
        chart.get(id).map_err(|_| PostingError::AccountNotFound(id))
    }

    fn draft(
        config: &PostingConfig,
        transaction: &Transaction,
        line_item_id: Option<ifrs_shared::types::LineItemId>,
        account_id: ifrs_shared::types::AccountId,
        entry_type: EntryType,
        amount: Decimal,
    ) -> LedgerDraft {
        LedgerDraft {
            transaction_id: transaction.id,
            line_item_id,
            post_date: transaction.date,
            account_id,
            entry_type,
            currency: transaction.currency.clone(),
            rate: transaction.exchange_rate,
            amount,
            functional_amount: CurrencyService::convert_with_precision(
                amount,
                transaction.exchange_rate,
                config.functional_precision,
            ),
        }
    }
}
