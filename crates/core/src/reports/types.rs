//! Report output types.
//!
//! All report amounts are in the entity's functional currency.

use chrono::NaiveDate;
use ifrs_shared::types::{AccountId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountType;
use crate::ledger::EntryType;

/// One account's contribution to a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Nominal code.
    pub code: i32,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total functional debits, including opening balances.
    pub debit: Decimal,
    /// Total functional credits, including opening balances.
    pub credit: Decimal,
    /// Net balance presented on the account's normal side; positive
    /// means the balance sits where the section expects it.
    pub balance: Decimal,
}

/// Trial balance: every account with its debit and credit totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Report cut-off (inclusive).
    pub end_date: NaiveDate,
    /// One line per account with activity.
    pub lines: Vec<AccountBalance>,
    /// Sum of the debit column.
    pub total_debits: Decimal,
    /// Sum of the credit column.
    pub total_credits: Decimal,
}

impl TrialBalance {
    /// Returns true if the debit and credit columns agree.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debits == self.total_credits
    }
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Report cut-off (inclusive).
    pub as_of: NaiveDate,
    /// Asset accounts, net debit positive.
    pub assets: Vec<AccountBalance>,
    /// Liability accounts, net credit positive.
    pub liabilities: Vec<AccountBalance>,
    /// Equity accounts, net credit positive.
    pub equity: Vec<AccountBalance>,
    /// Accumulated profit to date, folded into equity.
    pub net_profit: Decimal,
    /// Sum of assets.
    pub total_assets: Decimal,
    /// Sum of liabilities.
    pub total_liabilities: Decimal,
    /// Sum of equity including `net_profit`.
    pub total_equity: Decimal,
}

impl BalanceSheet {
    /// Returns true if assets equal liabilities plus equity.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities + self.total_equity
    }
}

/// One income statement section with its account lines and total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSection {
    /// Account lines in the section.
    pub lines: Vec<AccountBalance>,
    /// Section total.
    pub total: Decimal,
}

/// Income statement over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Window start (inclusive).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Operating revenue.
    pub operating_revenue: IncomeSection,
    /// Operating expenses.
    pub operating_expenses: IncomeSection,
    /// Operating revenue less operating expenses.
    pub gross_profit: Decimal,
    /// Non-operating revenue.
    pub non_operating_revenue: IncomeSection,
    /// Gross profit plus non-operating revenue.
    pub total_revenue: Decimal,
    /// Direct expenses.
    pub direct_expenses: IncomeSection,
    /// Overhead expenses.
    pub overhead_expenses: IncomeSection,
    /// Other expenses.
    pub other_expenses: IncomeSection,
    /// Total revenue less the three expense sections.
    pub net_profit: Decimal,
}

/// Cash flow statement over a date window, indirect method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Window start (inclusive).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Net profit for the window.
    pub net_profit: Decimal,
    /// Cash generated by operations: net profit adjusted for working
    /// capital movements.
    pub operating: Decimal,
    /// Cash used in investing: non-current asset movements.
    pub investing: Decimal,
    /// Cash from financing: equity and long-term debt movements.
    pub financing: Decimal,
    /// Sum of the three sections.
    pub net_cash_flow: Decimal,
    /// Bank balances at the start of the window.
    pub beginning_cash: Decimal,
    /// Bank balances at the end of the window.
    pub ending_cash: Decimal,
}

impl CashFlowStatement {
    /// Returns true if the sections reconcile to the cash movement.
    #[must_use]
    pub fn reconciles(&self) -> bool {
        self.beginning_cash + self.net_cash_flow == self.ending_cash
    }
}

/// One account's outstanding transactions bucketed by age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingLine {
    /// The receivable or payable account.
    pub account_id: AccountId,
    /// Account name.
    pub name: String,
    /// Outstanding functional amount per bracket; one more bucket than
    /// configured brackets for everything older than the last.
    pub buckets: Vec<Decimal>,
    /// Total outstanding.
    pub total: Decimal,
}

/// Aging schedule for receivables or payables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingSchedule {
    /// Report date outstanding ages are measured against.
    pub as_of: NaiveDate,
    /// Receivable or Payable.
    pub account_type: AccountType,
    /// Bracket upper bounds in days.
    pub brackets: Vec<u32>,
    /// One line per account with outstanding transactions.
    pub lines: Vec<AgingLine>,
    /// Column totals, same shape as each line's buckets.
    pub totals: Vec<Decimal>,
}

/// One row of an account statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Posting date.
    pub date: NaiveDate,
    /// Originating transaction.
    pub transaction_id: TransactionId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Functional amount.
    pub amount: Decimal,
    /// Running balance after this row (debits positive).
    pub balance: Decimal,
}

/// Chronological statement of one account over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// The account.
    pub account_id: AccountId,
    /// Window start (inclusive).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Balance brought forward from before the window.
    pub opening_balance: Decimal,
    /// Rows in posting order.
    pub lines: Vec<StatementLine>,
    /// Balance after the last row.
    pub closing_balance: Decimal,
}
