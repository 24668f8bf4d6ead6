//! Clearance error types.

use ifrs_shared::types::{AssignmentId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while assigning clearances.
#[derive(Debug, Error)]
pub enum ClearanceError {
    /// Both sides of an assignment must be posted.
    #[error("Transaction {0} is not posted and cannot participate in clearance")]
    UnpostedTransaction(TransactionId),

    /// A transaction cannot clear itself.
    #[error("Transaction {0} cannot clear itself")]
    SelfClearance(TransactionId),

    /// The cleared side's type does not accept clearance.
    #[error("Transaction {0} cannot be cleared")]
    UnclearableTransaction(TransactionId),

    /// The clearing side's type cannot clear others.
    #[error("Transaction {0} cannot clear other transactions")]
    UnassignableTransaction(TransactionId),

    /// Assignment amounts are strictly positive.
    #[error("Clearance amount must be positive")]
    NegativeClearanceAmount,

    /// Cumulative clearances cannot exceed the cleared amount.
    #[error("Clearance of {requested} exceeds the outstanding {outstanding} on transaction {cleared_id}")]
    OverClearance {
        /// The transaction being cleared.
        cleared_id: TransactionId,
        /// Amount requested.
        requested: Decimal,
        /// Amount still outstanding.
        outstanding: Decimal,
    },

    /// The clearing transaction has no unassigned balance left.
    #[error("Transaction {clearing_id} has only {available} left to assign, {requested} requested")]
    InsufficientBalance {
        /// The clearing transaction.
        clearing_id: TransactionId,
        /// Amount requested.
        requested: Decimal,
        /// Unassigned balance available.
        available: Decimal,
    },

    /// Both sides must share the same main account.
    #[error("Transactions {cleared_id} and {clearing_id} post to different main accounts")]
    InvalidClearanceAccount {
        /// The cleared side.
        cleared_id: TransactionId,
        /// The clearing side.
        clearing_id: TransactionId,
    },

    /// Both sides must share the same currency.
    #[error("Transactions {cleared_id} and {clearing_id} are in different currencies")]
    InvalidClearanceCurrency {
        /// The cleared side.
        cleared_id: TransactionId,
        /// The clearing side.
        clearing_id: TransactionId,
    },

    /// Rate differences need an entity forex account to absorb them.
    #[error("Entity has no forex account to post exchange rate differences to")]
    MissingForexAccount,

    /// Assignment not found.
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    /// Posting the forex adjustment failed.
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),
}

impl ClearanceError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnpostedTransaction(_) => "UNPOSTED_TRANSACTION",
            Self::SelfClearance(_) => "SELF_CLEARANCE",
            Self::UnclearableTransaction(_) => "UNCLEARABLE_TRANSACTION",
            Self::UnassignableTransaction(_) => "UNASSIGNABLE_TRANSACTION",
            Self::NegativeClearanceAmount => "NEGATIVE_CLEARANCE_AMOUNT",
            Self::OverClearance { .. } => "OVER_CLEARANCE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidClearanceAccount { .. } => "INVALID_CLEARANCE_ACCOUNT",
            Self::InvalidClearanceCurrency { .. } => "INVALID_CLEARANCE_CURRENCY",
            Self::MissingForexAccount => "MISSING_FOREX_ACCOUNT",
            Self::AssignmentNotFound(_) => "ASSIGNMENT_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
        }
    }
}

impl From<ClearanceError> for ifrs_shared::AppError {
    fn from(err: ClearanceError) -> Self {
        match err {
            ClearanceError::AssignmentNotFound(_) => Self::NotFound(err.to_string()),
            ClearanceError::NegativeClearanceAmount => Self::Validation(err.to_string()),
            ClearanceError::Ledger(inner) => inner.into(),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
