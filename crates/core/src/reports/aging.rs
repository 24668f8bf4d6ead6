//! Aging schedules for receivables and payables.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{AgingLine, AgingSchedule};
use crate::account::AccountType;
use crate::book::Book;
use crate::currency::CurrencyService;

impl ReportService {
    /// Outstanding clearable transactions bucketed by days overdue.
    ///
    /// Brackets come from the engine configuration; the final bucket
    /// collects everything older than the last bracket.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedAgingType` for anything other than receivable
    /// or payable accounts.
    pub fn aging_schedule(
        book: &Book,
        account_type: AccountType,
        as_of: NaiveDate,
    ) -> Result<AgingSchedule, ReportError> {
        if !matches!(account_type, AccountType::Receivable | AccountType::Payable) {
            return Err(ReportError::UnsupportedAgingType(account_type));
        }

        let brackets = book.config().aging.brackets.clone();
        let bucket_count = brackets.len() + 1;
        let mut lines = Vec::new();
        let mut totals = vec![Decimal::ZERO; bucket_count];

        for account in book.chart().of_type(account_type) {
            let mut buckets = vec![Decimal::ZERO; bucket_count];
            for transaction in book.transactions() {
                if transaction.account_id != account.id
                    || !transaction.is_clearable()
                    || transaction.date > as_of
                {
                    continue;
                }
                let outstanding =
                    transaction.amount() - book.assignments().cleared_total(transaction.id);
                if outstanding <= Decimal::ZERO {
                    continue;
                }
                let functional = CurrencyService::round(
                    outstanding * transaction.exchange_rate,
                    4,
                );
                let age_days = (as_of - transaction.date).num_days().max(0);
                let bucket = brackets
                    .iter()
                    .position(|&limit| age_days <= i64::from(limit))
                    .unwrap_or(brackets.len());
                buckets[bucket] += functional;
            }

            let total: Decimal = buckets.iter().copied().sum();
            if total.is_zero() {
                continue;
            }
            for (column, amount) in totals.iter_mut().zip(&buckets) {
                *column += *amount;
            }
            lines.push(AgingLine {
                account_id: account.id,
                name: account.name.clone(),
                buckets,
                total,
            });
        }

        Ok(AgingSchedule {
            as_of,
            account_type,
            brackets,
            lines,
            totals,
        })
    }
}
