//! Financial statement builders.
//!
//! Reports read the book; they never write to it. Balance sheet numbers
//! include opening balances, income statement numbers only cover their
//! window.

use chrono::NaiveDate;
use ifrs_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountBalance, AccountStatement, BalanceSheet, CashFlowStatement, IncomeSection,
    IncomeStatement, StatementLine, TrialBalance,
};
use crate::account::{Account, AccountType};
use crate::book::Book;
use crate::ledger::EntryType;

/// Stateless report service.
pub struct ReportService;

impl ReportService {
    /// Trial balance: every account's debit and credit totals up to a
    /// date, opening balances included.
    #[must_use]
    pub fn trial_balance(book: &Book, end_date: NaiveDate) -> TrialBalance {
        let mut lines = Vec::new();
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;

        for account in book.chart().iter() {
            let (debit, credit) = Self::cumulative_totals(book, account.id, end_date);
            if debit.is_zero() && credit.is_zero() {
                continue;
            }
            total_debits += debit;
            total_credits += credit;
            lines.push(Self::line(account, debit, credit));
        }

        TrialBalance {
            end_date,
            lines,
            total_debits,
            total_credits,
        }
    }

    /// Balance sheet as of a date.
    ///
    /// Income statement accounts are folded into equity as a single
    /// accumulated profit figure.
    #[must_use]
    pub fn balance_sheet(book: &Book, as_of: NaiveDate) -> BalanceSheet {
        let assets = Self::section_lines(book, &AccountType::ASSETS, as_of);
        let liabilities = Self::section_lines(book, &AccountType::LIABILITIES, as_of);
        let equity = Self::section_lines(book, &AccountType::EQUITY, as_of);

        let net_profit = Self::profit_up_to(book, as_of);
        let total_assets: Decimal = assets.iter().map(|l| l.balance).sum();
        let total_liabilities: Decimal = liabilities.iter().map(|l| l.balance).sum();
        let total_equity: Decimal =
            equity.iter().map(|l| l.balance).sum::<Decimal>() + net_profit;

        BalanceSheet {
            as_of,
            assets,
            liabilities,
            equity,
            net_profit,
            total_assets,
            total_liabilities,
            total_equity,
        }
    }

    /// Income statement over a window.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` if the window is inverted.
    pub fn income_statement(
        book: &Book,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatement, ReportError> {
        if from > to {
            return Err(ReportError::InvalidWindow { from, to });
        }

        let operating_revenue = Self::income_section(book, AccountType::OperatingRevenue, from, to);
        let operating_expenses = Self::income_section(book, AccountType::OperatingExpense, from, to);
        let gross_profit = operating_revenue.total - operating_expenses.total;

        let non_operating_revenue =
            Self::income_section(book, AccountType::NonOperatingRevenue, from, to);
        let total_revenue = gross_profit + non_operating_revenue.total;

        let direct_expenses = Self::income_section(book, AccountType::DirectExpense, from, to);
        let overhead_expenses = Self::income_section(book, AccountType::OverheadExpense, from, to);
        let other_expenses = Self::income_section(book, AccountType::OtherExpense, from, to);
        let net_profit = total_revenue
            - direct_expenses.total
            - overhead_expenses.total
            - other_expenses.total;

        Ok(IncomeStatement {
            from,
            to,
            operating_revenue,
            operating_expenses,
            gross_profit,
            non_operating_revenue,
            total_revenue,
            direct_expenses,
            overhead_expenses,
            other_expenses,
            net_profit,
        })
    }

    /// Cash flow statement over a window, indirect method.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` if the window is inverted.
    pub fn cash_flow(
        book: &Book,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CashFlowStatement, ReportError> {
        if from > to {
            return Err(ReportError::InvalidWindow { from, to });
        }

        // Working capital movements adjust net profit; long-term asset
        // and funding movements have their own sections.
        const OPERATING: [AccountType; 8] = [
            AccountType::Receivable,
            AccountType::Inventory,
            AccountType::CurrentAsset,
            AccountType::ContraAsset,
            AccountType::ControlAccount,
            AccountType::CurrentLiability,
            AccountType::Payable,
            AccountType::Reconciliation,
        ];
        const INVESTING: [AccountType; 1] = [AccountType::NonCurrentAsset];
        const FINANCING: [AccountType; 2] =
            [AccountType::NonCurrentLiability, AccountType::Equity];

        let net_profit = Self::profit_in_window(book, from, to);
        let operating = net_profit - Self::net_movement(book, &OPERATING, from, to);
        let investing = -Self::net_movement(book, &INVESTING, from, to);
        let financing = -Self::net_movement(book, &FINANCING, from, to);
        let net_cash_flow = operating + investing + financing;

        let ending_cash = Self::bank_balance(book, Some(to));
        let beginning_cash = from
            .pred_opt()
            .map_or(Decimal::ZERO, |day_before| {
                Self::bank_balance(book, Some(day_before))
            });

        Ok(CashFlowStatement {
            from,
            to,
            net_profit,
            operating,
            investing,
            financing,
            net_cash_flow,
            beginning_cash,
            ending_cash,
        })
    }

    /// Chronological statement of one account over a window.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidWindow`.
    pub fn account_statement(
        book: &Book,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AccountStatement, ReportError> {
        if from > to {
            return Err(ReportError::InvalidWindow { from, to });
        }
        book.chart()
            .get(account_id)
            .map_err(|_| ReportError::AccountNotFound(account_id))?;

        // Balance brought forward: opening balances plus rows before the
        // window, debits positive.
        let mut opening_balance: Decimal = book
            .opening_balances()
            .net_for_account(account_id);
        if let Some(day_before) = from.pred_opt() {
            let (debit, credit) =
                book.journal()
                    .totals_for_account(account_id, None, Some(day_before));
            opening_balance += debit - credit;
        }

        let mut rows: Vec<&crate::ledger::Ledger> = book
            .journal()
            .entries_for_account(account_id)
            .filter(|r| r.post_date >= from && r.post_date <= to)
            .collect();
        rows.sort_by_key(|r| r.post_date);

        let mut balance = opening_balance;
        let lines: Vec<StatementLine> = rows
            .into_iter()
            .map(|row| {
                balance += row.signed_functional_amount();
                StatementLine {
                    date: row.post_date,
                    transaction_id: row.transaction_id,
                    entry_type: row.entry_type,
                    amount: row.functional_amount,
                    balance,
                }
            })
            .collect();

        Ok(AccountStatement {
            account_id,
            from,
            to,
            opening_balance,
            lines,
            closing_balance: balance,
        })
    }

    // ---- shared helpers ----

    /// Debit and credit totals up to a date, opening balances included.
    pub(super) fn cumulative_totals(
        book: &Book,
        account_id: AccountId,
        end_date: NaiveDate,
    ) -> (Decimal, Decimal) {
        let (mut debit, mut credit) =
            book.journal()
                .totals_for_account(account_id, None, Some(end_date));
        for balance in book.opening_balances().for_account(account_id) {
            match balance.side {
                EntryType::Debit => debit += balance.functional_amount(),
                EntryType::Credit => credit += balance.functional_amount(),
            }
        }
        (debit, credit)
    }

    fn line(account: &Account, debit: Decimal, credit: Decimal) -> AccountBalance {
        AccountBalance {
            account_id: account.id,
            code: account.code,
            name: account.name.clone(),
            account_type: account.account_type,
            debit,
            credit,
            balance: account.account_type.signed_contribution(debit, credit),
        }
    }

    fn section_lines(
        book: &Book,
        section: &[AccountType],
        as_of: NaiveDate,
    ) -> Vec<AccountBalance> {
        let mut lines = Vec::new();
        for &account_type in section {
            for account in book.chart().of_type(account_type) {
                let (debit, credit) = Self::cumulative_totals(book, account.id, as_of);
                if debit.is_zero() && credit.is_zero() {
                    continue;
                }
                lines.push(Self::line(account, debit, credit));
            }
        }
        lines
    }

    fn income_section(
        book: &Book,
        account_type: AccountType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> IncomeSection {
        let mut lines = Vec::new();
        for account in book.chart().of_type(account_type) {
            let (debit, credit) =
                book.journal()
                    .totals_for_account(account.id, Some(from), Some(to));
            if debit.is_zero() && credit.is_zero() {
                continue;
            }
            lines.push(Self::line(account, debit, credit));
        }
        let total = lines.iter().map(|l| l.balance).sum();
        IncomeSection { lines, total }
    }

    /// Accumulated profit from the start of the books to a date.
    fn profit_up_to(book: &Book, as_of: NaiveDate) -> Decimal {
        let mut profit = Decimal::ZERO;
        for account in book.chart().iter() {
            if !account.account_type.is_income_statement() {
                continue;
            }
            let (debit, credit) = Self::cumulative_totals(book, account.id, as_of);
            profit += credit - debit;
        }
        profit
    }

    /// Profit earned inside a window.
    fn profit_in_window(book: &Book, from: NaiveDate, to: NaiveDate) -> Decimal {
        let mut profit = Decimal::ZERO;
        for account in book.chart().iter() {
            if !account.account_type.is_income_statement() {
                continue;
            }
            let (debit, credit) =
                book.journal()
                    .totals_for_account(account.id, Some(from), Some(to));
            profit += credit - debit;
        }
        profit
    }

    /// Net debit movement of a group of account types inside a window.
    fn net_movement(
        book: &Book,
        section: &[AccountType],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Decimal {
        let mut movement = Decimal::ZERO;
        for &account_type in section {
            for account in book.chart().of_type(account_type) {
                let (debit, credit) =
                    book.journal()
                        .totals_for_account(account.id, Some(from), Some(to));
                movement += debit - credit;
            }
        }
        movement
    }

    /// Net debit balance of all bank accounts up to a date.
    fn bank_balance(book: &Book, to: Option<NaiveDate>) -> Decimal {
        let mut balance = Decimal::ZERO;
        for account in book.chart().of_type(AccountType::Bank) {
            let (debit, credit) = match to {
                Some(end) => Self::cumulative_totals(book, account.id, end),
                None => book.journal().totals_for_account(account.id, None, None),
            };
            balance += debit - credit;
        }
        balance
    }
}
