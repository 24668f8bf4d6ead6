//! The clearance engine.
//!
//! Receipts, payments, and notes settle invoices, bills, and journals by
//! assignment. Assignments never exceed either side's balance, and rate
//! differences between the two sides post to the entity's forex account
//! as fresh ledger rows.

use std::collections::HashMap;

use chrono::Utc;
use ifrs_shared::config::PostingConfig;
use ifrs_shared::types::{AssignmentId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::assignment::{Assignment, ForexAdjustment};
use super::error::ClearanceError;
use crate::currency::CurrencyService;
use crate::entity::Entity;
use crate::ledger::{EntryType, Journal, LedgerDraft};
use crate::transaction::Transaction;

/// Store of assignments for one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentLog {
    assignments: Vec<Assignment>,
    cleared_totals: HashMap<TransactionId, Decimal>,
    assigned_totals: HashMap<TransactionId, Decimal>,
}

impl AssignmentLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total amount cleared off a transaction so far.
    #[must_use]
    pub fn cleared_total(&self, cleared_id: TransactionId) -> Decimal {
        self.cleared_totals
            .get(&cleared_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total amount a clearing transaction has assigned so far.
    #[must_use]
    pub fn assigned_total(&self, clearing_id: TransactionId) -> Decimal {
        self.assigned_totals
            .get(&clearing_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Assignments against a cleared transaction.
    pub fn for_cleared(&self, cleared_id: TransactionId) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.cleared_id == cleared_id)
    }

    /// Assignments made by a clearing transaction.
    pub fn for_clearing(&self, clearing_id: TransactionId) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.clearing_id == clearing_id)
    }

    /// All assignments in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Looks up an assignment by ID.
    #[must_use]
    pub fn get(&self, id: AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    fn insert(&mut self, assignment: Assignment) {
        *self
            .cleared_totals
            .entry(assignment.cleared_id)
            .or_insert(Decimal::ZERO) += assignment.amount;
        *self
            .assigned_totals
            .entry(assignment.clearing_id)
            .or_insert(Decimal::ZERO) += assignment.amount;
        self.assignments.push(assignment);
    }

    fn remove(&mut self, id: AssignmentId) -> Option<Assignment> {
        let index = self.assignments.iter().position(|a| a.id == id)?;
        let assignment = self.assignments.remove(index);
        if let Some(total) = self.cleared_totals.get_mut(&assignment.cleared_id) {
            *total -= assignment.amount;
        }
        if let Some(total) = self.assigned_totals.get_mut(&assignment.clearing_id) {
            *total -= assignment.amount;
        }
        Some(assignment)
    }
}

/// Stateless clearance service.
pub struct ClearingService;

impl ClearingService {
    /// Assigns part of a clearing transaction against a cleared one.
    ///
    /// Both sides must be posted, share the same main account and
    /// currency, and have enough unmatched balance. When the two sides
    /// carry different exchange rates, the functional difference posts to
    /// the entity's forex account and is remembered on the assignment.
    ///
    /// # Errors
    ///
    /// Returns a [`ClearanceError`] naming the violated rule; nothing is
    /// recorded on error.
    pub fn assign(
        entity: &Entity,
        config: &PostingConfig,
        log: &mut AssignmentLog,
        journal: &mut Journal,
        cleared: &Transaction,
        clearing: &Transaction,
        amount: Decimal,
    ) -> Result<AssignmentId, ClearanceError> {
        if amount <= Decimal::ZERO {
            return Err(ClearanceError::NegativeClearanceAmount);
        }
        if !cleared.posted {
            return Err(ClearanceError::UnpostedTransaction(cleared.id));
        }
        if !clearing.posted {
            return Err(ClearanceError::UnpostedTransaction(clearing.id));
        }
        if cleared.id == clearing.id {
            return Err(ClearanceError::SelfClearance(cleared.id));
        }
        if !cleared.transaction_type.is_clearable() {
            return Err(ClearanceError::UnclearableTransaction(cleared.id));
        }
        if !clearing.transaction_type.is_assignable() {
            return Err(ClearanceError::UnassignableTransaction(clearing.id));
        }
        if cleared.account_id != clearing.account_id {
            return Err(ClearanceError::InvalidClearanceAccount {
                cleared_id: cleared.id,
                clearing_id: clearing.id,
            });
        }
        if cleared.currency != clearing.currency {
            return Err(ClearanceError::InvalidClearanceCurrency {
                cleared_id: cleared.id,
                clearing_id: clearing.id,
            });
        }

        let available = clearing.amount() - log.assigned_total(clearing.id);
        if amount > available {
            return Err(ClearanceError::InsufficientBalance {
                clearing_id: clearing.id,
                requested: amount,
                available,
            });
        }
        let outstanding = cleared.amount() - log.cleared_total(cleared.id);
        if amount > outstanding {
            return Err(ClearanceError::OverClearance {
                cleared_id: cleared.id,
                requested: amount,
                outstanding,
            });
        }

        let forex = Self::post_forex_adjustment(entity, config, journal, cleared, clearing, amount)?;

        let assignment = Assignment {
            id: AssignmentId::new(),
            entity_id: entity.id,
            cleared_id: cleared.id,
            clearing_id: clearing.id,
            amount,
            assigned_at: Utc::now(),
            forex,
        };
        let id = assignment.id;
        log.insert(assignment);
        info!(
            assignment_id = %id,
            cleared_id = %cleared.id,
            clearing_id = %clearing.id,
            %amount,
            "clearance assigned"
        );
        Ok(id)
    }

    /// Clears a transaction against outstanding candidates oldest first.
    ///
    /// Candidates with nothing outstanding are skipped; assignment stops
    /// once the clearing transaction's balance is used up. Returns the
    /// assignments made, possibly empty.
    ///
    /// # Errors
    ///
    /// As [`assign`](Self::assign) for each candidate actually matched.
    pub fn clear_fifo(
        entity: &Entity,
        config: &PostingConfig,
        log: &mut AssignmentLog,
        journal: &mut Journal,
        clearing: &Transaction,
        candidates: &[&Transaction],
    ) -> Result<Vec<AssignmentId>, ClearanceError> {
        let mut ordered: Vec<&Transaction> = candidates.to_vec();
        ordered.sort_by_key(|t| (t.date, t.id));

        let mut made = Vec::new();
        for cleared in ordered {
            let available = clearing.amount() - log.assigned_total(clearing.id);
            if available <= Decimal::ZERO {
                break;
            }
            let outstanding = cleared.amount() - log.cleared_total(cleared.id);
            if outstanding <= Decimal::ZERO {
                continue;
            }
            let amount = available.min(outstanding);
            made.push(Self::assign(
                entity, config, log, journal, cleared, clearing, amount,
            )?);
        }
        Ok(made)
    }

    /// Removes an assignment, restoring both sides' balances.
    ///
    /// Any forex adjustment posted with the assignment is reversed with a
    /// fresh ledger pair.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound`, or a ledger error from the reversal.
    pub fn unassign(
        entity: &Entity,
        log: &mut AssignmentLog,
        journal: &mut Journal,
        id: AssignmentId,
    ) -> Result<Assignment, ClearanceError> {
        let Some(assignment) = log.remove(id) else {
            return Err(ClearanceError::AssignmentNotFound(id));
        };

        if let Some(forex) = &assignment.forex {
            let (forex_side, offset_side) = if forex.credited {
                // The gain was credited to forex; the reversal debits it.
                (EntryType::Debit, EntryType::Credit)
            } else {
                (EntryType::Credit, EntryType::Debit)
            };
            journal.commit(vec![
                Self::functional_draft(
                    entity,
                    assignment.clearing_id,
                    forex,
                    forex.account_id,
                    forex_side,
                ),
                Self::functional_draft(
                    entity,
                    assignment.clearing_id,
                    forex,
                    forex.offset_account_id,
                    offset_side,
                ),
            ])?;
        }

        info!(assignment_id = %id, "clearance unassigned");
        Ok(assignment)
    }

    /// Amount still outstanding on a cleared transaction.
    #[must_use]
    pub fn outstanding(log: &AssignmentLog, cleared: &Transaction) -> Decimal {
        cleared.amount() - log.cleared_total(cleared.id)
    }

    /// Posts the functional rate difference between the two sides, if
    /// any.
    ///
    /// The residual is the difference of the two rounded functional legs
    /// at the posting precision, so a full clearance always washes the
    /// main account to zero even when the legs round in opposite
    /// directions.
    fn post_forex_adjustment(
        entity: &Entity,
        config: &PostingConfig,
        journal: &mut Journal,
        cleared: &Transaction,
        clearing: &Transaction,
        amount: Decimal,
    ) -> Result<Option<ForexAdjustment>, ClearanceError> {
        let precision = config.functional_precision;
        let residual =
            CurrencyService::convert_with_precision(amount, cleared.exchange_rate, precision)
                - CurrencyService::convert_with_precision(amount, clearing.exchange_rate, precision);
        if residual.is_zero() {
            return Ok(None);
        }
        let forex_account = entity
            .forex_account_id
            .ok_or(ClearanceError::MissingForexAccount)?;

        // A positive residual leaves value stranded on the main account:
        // a loss, debited to forex. A negative residual is a gain,
        // credited to forex.
        let loss = residual > Decimal::ZERO;
        let forex = ForexAdjustment {
            account_id: forex_account,
            offset_account_id: cleared.account_id,
            post_date: clearing.date,
            amount: residual.abs(),
            credited: !loss,
        };
        let (forex_side, offset_side) = if loss {
            (EntryType::Debit, EntryType::Credit)
        } else {
            (EntryType::Credit, EntryType::Debit)
        };
        journal.commit(vec![
            Self::functional_draft(entity, clearing.id, &forex, forex.account_id, forex_side),
            Self::functional_draft(
                entity,
                clearing.id,
                &forex,
                forex.offset_account_id,
                offset_side,
            ),
        ])?;
        Ok(Some(forex))
    }

    fn functional_draft(
        entity: &Entity,
        transaction_id: TransactionId,
        forex: &ForexAdjustment,
        account_id: ifrs_shared::types::AccountId,
        entry_type: EntryType,
    ) -> LedgerDraft {
        LedgerDraft {
            transaction_id,
            line_item_id: None,
            post_date: forex.post_date,
            account_id,
            entry_type,
            currency: entity.functional_currency.clone(),
            rate: Decimal::ONE,
            amount: forex.amount,
            functional_amount: forex.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountType, ChartOfAccounts};
    use crate::fiscal::PeriodCalendar;
    use crate::ledger::PostingService;
    use crate::transaction::{LineItem, TransactionType};
    use chrono::NaiveDate;
    use ifrs_shared::config::PostingConfig;
    use ifrs_shared::types::{AccountId, Currency};
    use rust_decimal_macros::dec;

    struct Fixture {
        entity: Entity,
        chart: ChartOfAccounts,
        calendar: PeriodCalendar,
        config: PostingConfig,
        journal: Journal,
        log: AssignmentLog,
        receivable: AccountId,
        revenue: AccountId,
        bank: AccountId,
    }

    fn fixture() -> Fixture {
        let usd = Currency::new("USD").unwrap();
        let mut entity = Entity::new("Test Ltd", usd.clone());
        let mut chart = ChartOfAccounts::new();
        let receivable = chart
            .add(entity.id, "Clients", AccountType::Receivable, usd.clone())
            .unwrap();
        let revenue = chart
            .add(entity.id, "Sales", AccountType::OperatingRevenue, usd.clone())
            .unwrap();
        let bank = chart
            .add(entity.id, "Main Bank", AccountType::Bank, usd.clone())
            .unwrap();
        let forex = chart
            .add(entity.id, "Forex Gains/Losses", AccountType::NonOperatingRevenue, usd)
            .unwrap();
        entity.forex_account_id = Some(forex);
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&entity, 2026).unwrap();
        let journal = Journal::new(entity.id);
        Fixture {
            entity,
            chart,
            calendar,
            config: PostingConfig::default(),
            journal,
            log: AssignmentLog::new(),
            receivable,
            revenue,
            bank,
        }
    }

    fn posted(
        fx: &mut Fixture,
        transaction_type: TransactionType,
        day: u32,
        amount: Decimal,
        rate: Decimal,
    ) -> Transaction {
        let line_account = match transaction_type {
            TransactionType::ClientInvoice => fx.revenue,
            _ => fx.bank,
        };
        let mut txn = Transaction::new(
            fx.entity.id,
            transaction_type,
            NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            fx.receivable,
            Currency::new("USD").unwrap(),
            rate,
            format!("{}0001/2026", transaction_type.prefix()),
            "Clearance test",
        );
        txn.add_line_item(LineItem::new(line_account, amount).unwrap())
            .unwrap();
        PostingService::post(
            &fx.entity,
            &fx.chart,
            &fx.calendar,
            &fx.config,
            &mut fx.journal,
            &mut txn,
        )
        .unwrap();
        txn
    }

    #[test]
    fn test_assign_partial_clearance() {
        let mut fx = fixture();
        let invoice = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), Decimal::ONE);
        let receipt = posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(60), Decimal::ONE);

        ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(60),
        )
        .unwrap();

        assert_eq!(fx.log.cleared_total(invoice.id), dec!(60));
        assert_eq!(ClearingService::outstanding(&fx.log, &invoice), dec!(40));
    }

    #[test]
    fn test_over_clearance_rejected() {
        let mut fx = fixture();
        let invoice = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(50), Decimal::ONE);
        let receipt = posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(100), Decimal::ONE);

        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(80),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::OverClearance { .. }));
    }

    #[test]
    fn test_clearing_balance_exhaustion_rejected() {
        let mut fx = fixture();
        let first = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), Decimal::ONE);
        let second = posted(&mut fx, TransactionType::ClientInvoice, 2, dec!(100), Decimal::ONE);
        let receipt = posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(80), Decimal::ONE);

        ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &first,
            &receipt,
            dec!(80),
        )
        .unwrap();
        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &second,
            &receipt,
            dec!(10),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_role_rules() {
        let mut fx = fixture();
        let invoice = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), Decimal::ONE);
        let receipt = posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(50), Decimal::ONE);

        // A receipt cannot be cleared, and an invoice cannot clear.
        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &receipt,
            &invoice,
            dec!(10),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::UnclearableTransaction(_)));
    }

    #[test]
    fn test_self_clearance_rejected() {
        let mut fx = fixture();
        let journal_entry = {
            let mut txn = Transaction::new(
                fx.entity.id,
                TransactionType::JournalEntry,
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                fx.receivable,
                Currency::new("USD").unwrap(),
                Decimal::ONE,
                "JN0001/2026",
                "Journal",
            );
            txn.add_line_item(LineItem::new(fx.revenue, dec!(100)).unwrap())
                .unwrap();
            PostingService::post(
                &fx.entity,
                &fx.chart,
                &fx.calendar,
                &fx.config,
                &mut fx.journal,
                &mut txn,
            )
            .unwrap();
            txn
        };

        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &journal_entry,
            &journal_entry,
            dec!(10),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::SelfClearance(_)));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut fx = fixture();
        let invoice = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), Decimal::ONE);
        let mut receipt =
            posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(50), Decimal::ONE);
        receipt.currency = Currency::new("EUR").unwrap();

        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(50),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::InvalidClearanceCurrency { .. }));
    }

    #[test]
    fn test_forex_difference_posts_to_forex_account() {
        let mut fx = fixture();
        let invoice =
            posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), dec!(1.10));
        let receipt =
            posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(100), dec!(1.20));
        let rows_before = fx.journal.len();

        let id = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(100),
        )
        .unwrap();

        // Settled at a higher rate than booked: a gain of 10.
        assert_eq!(fx.journal.len(), rows_before + 2);
        let assignment = fx.log.get(id).unwrap();
        let forex = assignment.forex.as_ref().unwrap();
        assert_eq!(forex.amount, dec!(10.0000));
        assert!(forex.credited);
        fx.journal.verify().unwrap();
    }

    #[test]
    fn test_forex_adjustment_washes_rounded_legs() {
        let mut fx = fixture();
        // Both legs sit on rounding midpoints: 1.00005 rounds down to
        // 1.0000, 1.00015 rounds up to 1.0002. The adjustment must cover
        // the gap between the rounded legs, not the rounded rate delta.
        let invoice =
            posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(1), dec!(1.00005));
        let receipt =
            posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(1), dec!(1.00015));

        let id = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(1),
        )
        .unwrap();

        let forex = fx.log.get(id).unwrap().forex.as_ref().unwrap();
        assert_eq!(forex.amount, dec!(0.0002));
        assert!(forex.credited);

        // Fully cleared: the receivable washes to zero.
        let (debits, credits) = fx.journal.totals_for_account(fx.receivable, None, None);
        assert_eq!(debits, credits);
    }

    #[test]
    fn test_forex_without_account_rejected() {
        let mut fx = fixture();
        fx.entity.forex_account_id = None;
        let invoice =
            posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), dec!(1.10));
        let receipt =
            posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(100), dec!(1.20));

        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(100),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::MissingForexAccount));
    }

    #[test]
    fn test_unassign_restores_balances_and_reverses_forex() {
        let mut fx = fixture();
        let invoice =
            posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), dec!(1.10));
        let receipt =
            posted(&mut fx, TransactionType::ClientReceipt, 5, dec!(100), dec!(1.20));

        let id = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &receipt,
            dec!(100),
        )
        .unwrap();
        let rows_after_assign = fx.journal.len();

        ClearingService::unassign(&fx.entity, &mut fx.log, &mut fx.journal, id).unwrap();

        assert_eq!(fx.log.cleared_total(invoice.id), Decimal::ZERO);
        assert_eq!(ClearingService::outstanding(&fx.log, &invoice), dec!(100));
        // The reversal appends rather than rewrites.
        assert_eq!(fx.journal.len(), rows_after_assign + 2);
        fx.journal.verify().unwrap();

        let forex_account = fx.entity.forex_account_id.unwrap();
        let (debits, credits) = fx.journal.totals_for_account(forex_account, None, None);
        assert_eq!(debits, credits);
    }

    #[test]
    fn test_clear_fifo_matches_oldest_first() {
        let mut fx = fixture();
        let older = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(60), Decimal::ONE);
        let newer = posted(&mut fx, TransactionType::ClientInvoice, 10, dec!(60), Decimal::ONE);
        let receipt = posted(&mut fx, TransactionType::ClientReceipt, 15, dec!(90), Decimal::ONE);

        let made = ClearingService::clear_fifo(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &receipt,
            &[&newer, &older],
        )
        .unwrap();

        assert_eq!(made.len(), 2);
        assert_eq!(fx.log.cleared_total(older.id), dec!(60));
        assert_eq!(fx.log.cleared_total(newer.id), dec!(30));
        assert_eq!(fx.log.assigned_total(receipt.id), dec!(90));
    }

    #[test]
    fn test_unposted_transaction_rejected() {
        let mut fx = fixture();
        let invoice = posted(&mut fx, TransactionType::ClientInvoice, 1, dec!(100), Decimal::ONE);
        let mut draft = Transaction::new(
            fx.entity.id,
            TransactionType::ClientReceipt,
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            fx.receivable,
            Currency::new("USD").unwrap(),
            Decimal::ONE,
            "RC0002/2026",
            "Unposted",
        );
        draft
            .add_line_item(LineItem::new(fx.bank, dec!(50)).unwrap())
            .unwrap();

        let err = ClearingService::assign(
            &fx.entity,
            &fx.config,
            &mut fx.log,
            &mut fx.journal,
            &invoice,
            &draft,
            dec!(50),
        )
        .unwrap_err();
        assert!(matches!(err, ClearanceError::UnpostedTransaction(_)));
    }
}
