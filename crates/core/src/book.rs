//! The book of accounts: one entity's complete books.
//!
//! `Book` composes the chart, calendar, rate table, journal, opening
//! balances, and assignment log, wires the stateless services across
//! them, and hands out reference numbers.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use ifrs_shared::config::EngineConfig;
use ifrs_shared::types::{
    AccountId, AssignmentId, BalanceId, Currency, ReportingPeriodId, TransactionId,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::account::{Account, AccountError, AccountType, ChartOfAccounts};
use crate::clearing::{Assignment, AssignmentLog, ClearanceError, ClearingService};
use crate::currency::{CurrencyError, RateTable};
use crate::entity::Entity;
use crate::fiscal::{OpeningBalances, PeriodCalendar, PeriodError, PeriodStatus};
use crate::ledger::{EntryType, Journal, PostingError, PostingService};
use crate::transaction::{LineItem, Transaction, TransactionError, TransactionType};

/// Errors surfaced by book operations.
#[derive(Debug, Error)]
pub enum BookError {
    /// Chart of accounts rule violated.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Reporting period rule violated.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Exchange rate lookup or registration failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Transaction-level rule violated.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Posting failed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Clearance failed.
    #[error(transparent)]
    Clearance(#[from] ClearanceError),

    /// Transaction does not exist in this book.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

impl From<BookError> for ifrs_shared::AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Account(inner) => inner.into(),
            BookError::Period(inner) => inner.into(),
            BookError::Currency(inner) => inner.into(),
            BookError::Transaction(inner) => inner.into(),
            BookError::Posting(inner) => inner.into(),
            BookError::Clearance(inner) => inner.into(),
            BookError::TransactionNotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

/// One entity's books.
#[derive(Debug)]
pub struct Book {
    entity: Entity,
    config: EngineConfig,
    chart: ChartOfAccounts,
    calendar: PeriodCalendar,
    rates: RateTable,
    balances: OpeningBalances,
    transactions: BTreeMap<TransactionId, Transaction>,
    journal: Journal,
    assignments: AssignmentLog,
    sequences: HashMap<(TransactionType, i32), u32>,
}

impl Book {
    /// Opens empty books for an entity.
    #[must_use]
    pub fn new(entity: Entity, config: EngineConfig) -> Self {
        let journal = Journal::new(entity.id);
        Self {
            entity,
            config,
            chart: ChartOfAccounts::new(),
            calendar: PeriodCalendar::new(),
            rates: RateTable::new(),
            balances: OpeningBalances::new(),
            transactions: BTreeMap::new(),
            journal,
            assignments: AssignmentLog::new(),
            sequences: HashMap::new(),
        }
    }

    /// The entity these books belong to.
    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Engine configuration in force.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// The reporting calendar.
    #[must_use]
    pub fn calendar(&self) -> &PeriodCalendar {
        &self.calendar
    }

    /// The journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The opening balances.
    #[must_use]
    pub fn opening_balances(&self) -> &OpeningBalances {
        &self.balances
    }

    /// The assignment log.
    #[must_use]
    pub fn assignments(&self) -> &AssignmentLog {
        &self.assignments
    }

    /// The exchange rate table.
    #[must_use]
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Designates the account absorbing forex gains and losses.
    pub fn set_forex_account(&mut self, account_id: AccountId) {
        self.entity.forex_account_id = Some(account_id);
    }

    // ---- chart ----

    /// Adds an account, allocating the next code in its section.
    ///
    /// # Errors
    ///
    /// See [`ChartOfAccounts::add`].
    pub fn add_account(
        &mut self,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<AccountId, BookError> {
        Ok(self.chart.add(self.entity.id, name, account_type, currency)?)
    }

    /// Adds an account with an explicit nominal code.
    ///
    /// # Errors
    ///
    /// See [`ChartOfAccounts::add_with_code`].
    pub fn add_account_with_code(
        &mut self,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
        code: i32,
    ) -> Result<AccountId, BookError> {
        Ok(self
            .chart
            .add_with_code(self.entity.id, name, account_type, currency, code)?)
    }

    /// Changes an account's type, forbidden once it has ledger entries.
    ///
    /// # Errors
    ///
    /// See [`ChartOfAccounts::change_type`].
    pub fn change_account_type(
        &mut self,
        id: AccountId,
        new_type: AccountType,
    ) -> Result<(), BookError> {
        let has_entries = self.journal.has_entries(id);
        Ok(self.chart.change_type(id, new_type, has_entries)?)
    }

    /// Looks up an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`.
    pub fn account(&self, id: AccountId) -> Result<&Account, BookError> {
        Ok(self.chart.get(id)?)
    }

    // ---- calendar and rates ----

    /// Opens the reporting period starting in the given calendar year.
    ///
    /// # Errors
    ///
    /// See [`PeriodCalendar::add_year`].
    pub fn add_reporting_period(&mut self, year: i32) -> Result<ReportingPeriodId, BookError> {
        Ok(self.calendar.add_year(&self.entity, year)?)
    }

    /// Moves a reporting period to a new status.
    ///
    /// # Errors
    ///
    /// See [`PeriodCalendar::set_status`].
    pub fn set_period_status(&mut self, year: i32, status: PeriodStatus) -> Result<(), BookError> {
        Ok(self.calendar.set_status(year, status)?)
    }

    /// Registers an exchange rate from a currency to the functional
    /// currency.
    ///
    /// # Errors
    ///
    /// See [`RateTable::add`].
    pub fn add_exchange_rate(
        &mut self,
        from_currency: Currency,
        rate: Decimal,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> Result<(), BookError> {
        self.rates.add(
            self.entity.id,
            from_currency,
            self.entity.functional_currency.clone(),
            rate,
            valid_from,
            valid_to,
        )?;
        Ok(())
    }

    /// Records an opening balance into the period of the given year.
    ///
    /// # Errors
    ///
    /// Returns `NoPeriodForYear` for an unknown year, and the opening
    /// balance validation errors.
    #[allow(clippy::too_many_arguments)]
    pub fn add_opening_balance(
        &mut self,
        year: i32,
        account_id: AccountId,
        transaction_date: NaiveDate,
        currency: Currency,
        exchange_rate: Decimal,
        amount: Decimal,
        side: EntryType,
    ) -> Result<BalanceId, BookError> {
        let period = self
            .calendar
            .iter()
            .find(|p| p.calendar_year == year)
            .ok_or(PeriodError::NoPeriodForYear(year))?
            .clone();
        Ok(self.balances.add(
            &period,
            account_id,
            transaction_date,
            currency,
            exchange_rate,
            amount,
            side,
        )?)
    }

    // ---- transactions ----

    /// Drafts a transaction, resolving its exchange rate and reference
    /// number.
    ///
    /// The rate comes from the table for the transaction date; the
    /// identity rate is used when the currency is already functional.
    ///
    /// # Errors
    ///
    /// Returns `NoExchangeRate` when the currency cannot be converted.
    pub fn draft_transaction(
        &mut self,
        transaction_type: TransactionType,
        date: NaiveDate,
        account_id: AccountId,
        currency: Currency,
        narration: impl Into<String>,
    ) -> Result<TransactionId, BookError> {
        let rate = self
            .rates
            .rate_for(&currency, &self.entity.functional_currency, date)?;
        let reference = self.next_reference(transaction_type, date);
        let transaction = Transaction::new(
            self.entity.id,
            transaction_type,
            date,
            account_id,
            currency,
            rate,
            reference,
            narration,
        );
        let id = transaction.id;
        debug!(transaction_id = %id, reference = %transaction.reference, "transaction drafted");
        self.transactions.insert(id, transaction);
        Ok(id)
    }

    /// Adds a line item to a drafted transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or the transaction mutation errors.
    pub fn add_line_item(
        &mut self,
        transaction_id: TransactionId,
        line_item: LineItem,
    ) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get_mut(&transaction_id)
            .ok_or(BookError::TransactionNotFound(transaction_id))?;
        transaction.add_line_item(line_item)?;
        Ok(())
    }

    /// Looks up a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`.
    pub fn transaction(&self, id: TransactionId) -> Result<&Transaction, BookError> {
        self.transactions
            .get(&id)
            .ok_or(BookError::TransactionNotFound(id))
    }

    /// Mutable access to a drafted transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`.
    pub fn transaction_mut(&mut self, id: TransactionId) -> Result<&mut Transaction, BookError> {
        self.transactions
            .get_mut(&id)
            .ok_or(BookError::TransactionNotFound(id))
    }

    /// All transactions, excluding soft-deleted ones.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .values()
            .filter(|t| t.deleted_at.is_none())
    }

    /// Soft-deletes an unposted transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or `CannotDeletePosted`.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(BookError::TransactionNotFound(id))?;
        transaction.soft_delete()?;
        Ok(())
    }

    /// Restores a soft-deleted transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`.
    pub fn restore_transaction(&mut self, id: TransactionId) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(BookError::TransactionNotFound(id))?;
        transaction.restore();
        Ok(())
    }

    /// Permanently removes an unposted transaction from the book.
    ///
    /// Unlike a soft delete this cannot be restored. Posted transactions
    /// have ledger entries and can only be reversed, never removed.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or `CannotDeletePosted`.
    pub fn destroy_transaction(&mut self, id: TransactionId) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get(&id)
            .ok_or(BookError::TransactionNotFound(id))?;
        if transaction.posted {
            return Err(TransactionError::CannotDeletePosted(id).into());
        }
        self.transactions.remove(&id);
        Ok(())
    }

    // ---- posting ----

    /// Posts a drafted transaction to the journal.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or a [`PostingError`].
    pub fn post(&mut self, id: TransactionId) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(BookError::TransactionNotFound(id))?;
        PostingService::post(
            &self.entity,
            &self.chart,
            &self.calendar,
            &self.config.posting,
            &mut self.journal,
            transaction,
        )?;
        Ok(())
    }

    /// Posts with optimistic account version guards.
    ///
    /// # Errors
    ///
    /// As [`post`](Self::post), plus `AccountVersionMismatch`.
    pub fn post_guarded(
        &mut self,
        id: TransactionId,
        expected_versions: &[(AccountId, u64)],
    ) -> Result<(), BookError> {
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(BookError::TransactionNotFound(id))?;
        PostingService::post_guarded(
            &self.entity,
            &self.chart,
            &self.calendar,
            &self.config.posting,
            &mut self.journal,
            transaction,
            expected_versions,
        )?;
        Ok(())
    }

    /// Current journal version of an account, for guarded posting.
    #[must_use]
    pub fn account_version(&self, account_id: AccountId) -> u64 {
        self.journal.account_version(account_id)
    }

    // ---- clearance ----

    /// Assigns part of a clearing transaction against a cleared one.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or a [`ClearanceError`].
    pub fn assign(
        &mut self,
        cleared_id: TransactionId,
        clearing_id: TransactionId,
        amount: Decimal,
    ) -> Result<AssignmentId, BookError> {
        let cleared = self
            .transactions
            .get(&cleared_id)
            .ok_or(BookError::TransactionNotFound(cleared_id))?;
        let clearing = self
            .transactions
            .get(&clearing_id)
            .ok_or(BookError::TransactionNotFound(clearing_id))?;
        Ok(ClearingService::assign(
            &self.entity,
            &self.config.posting,
            &mut self.assignments,
            &mut self.journal,
            cleared,
            clearing,
            amount,
        )?)
    }

    /// Clears a transaction against every compatible outstanding
    /// candidate, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or a [`ClearanceError`].
    pub fn clear_fifo(&mut self, clearing_id: TransactionId) -> Result<Vec<AssignmentId>, BookError> {
        let clearing = self
            .transactions
            .get(&clearing_id)
            .ok_or(BookError::TransactionNotFound(clearing_id))?;
        let candidates: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| {
                t.id != clearing.id
                    && t.deleted_at.is_none()
                    && t.is_clearable()
                    && t.account_id == clearing.account_id
                    && t.currency == clearing.currency
            })
            .collect();
        Ok(ClearingService::clear_fifo(
            &self.entity,
            &self.config.posting,
            &mut self.assignments,
            &mut self.journal,
            clearing,
            &candidates,
        )?)
    }

    /// Removes an assignment, reversing any forex adjustment.
    ///
    /// # Errors
    ///
    /// Returns a [`ClearanceError`].
    pub fn unassign(&mut self, id: AssignmentId) -> Result<Assignment, BookError> {
        Ok(ClearingService::unassign(
            &self.entity,
            &mut self.assignments,
            &mut self.journal,
            id,
        )?)
    }

    /// Amount still outstanding on a cleared transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`.
    pub fn outstanding(&self, cleared_id: TransactionId) -> Result<Decimal, BookError> {
        let cleared = self
            .transactions
            .get(&cleared_id)
            .ok_or(BookError::TransactionNotFound(cleared_id))?;
        Ok(ClearingService::outstanding(&self.assignments, cleared))
    }

    // ---- references ----

    /// Next reference number for a transaction type, scoped to the
    /// fiscal year of the date.
    fn next_reference(&mut self, transaction_type: TransactionType, date: NaiveDate) -> String {
        let year = self.calendar.year_of(date);
        let sequence = self
            .sequences
            .entry((transaction_type, year))
            .or_insert(0);
        *sequence += 1;
        format!("{}{:04}/{}", transaction_type.prefix(), sequence, year)
    }
}
