//! Financial statements built from the book.

pub mod aging;
pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::{
    AccountBalance, AccountStatement, AgingLine, AgingSchedule, BalanceSheet, CashFlowStatement,
    IncomeSection, IncomeStatement, StatementLine, TrialBalance,
};
