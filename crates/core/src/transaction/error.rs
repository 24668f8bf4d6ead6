//! Transaction error types.

use ifrs_shared::types::{AccountId, LineItemId, TransactionId};
use thiserror::Error;

use super::types::TransactionType;

/// Errors that can occur while building or mutating transactions.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Posted transactions are immutable.
    #[error("Transaction {0} is posted and cannot be modified")]
    PostedTransaction(TransactionId),

    /// Line item amount cannot be negative.
    #[error("Line item amount cannot be negative")]
    NegativeAmount,

    /// Line item quantity cannot be negative.
    #[error("Line item quantity cannot be negative")]
    NegativeQuantity,

    /// VAT rate cannot be negative.
    #[error("VAT rate cannot be negative")]
    NegativeVatRate,

    /// A transaction needs at least one line item to post.
    #[error("Transaction {0} has no line items")]
    MissingLineItem(TransactionId),

    /// The main account cannot appear as a line item account.
    #[error("Account {0} is the transaction's main account and cannot carry a line item")]
    MainAccountLineItem(AccountId),

    /// Line item not found on the transaction.
    #[error("Line item not found: {0}")]
    LineItemNotFound(LineItemId),

    /// Only journal entries may choose the main account side.
    #[error("The main account side of a {0} is fixed")]
    DirectionFixed(TransactionType),

    /// Posted transactions cannot be deleted, only reversed.
    #[error("Transaction {0} is posted and cannot be deleted")]
    CannotDeletePosted(TransactionId),
}

impl TransactionError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PostedTransaction(_) => "POSTED_TRANSACTION",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::NegativeQuantity => "NEGATIVE_QUANTITY",
            Self::NegativeVatRate => "NEGATIVE_VAT_RATE",
            Self::MissingLineItem(_) => "MISSING_LINE_ITEM",
            Self::MainAccountLineItem(_) => "MAIN_ACCOUNT_LINE_ITEM",
            Self::LineItemNotFound(_) => "LINE_ITEM_NOT_FOUND",
            Self::DirectionFixed(_) => "DIRECTION_FIXED",
            Self::CannotDeletePosted(_) => "CANNOT_DELETE_POSTED",
        }
    }
}

impl From<TransactionError> for ifrs_shared::AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::LineItemNotFound(_) => Self::NotFound(err.to_string()),
            TransactionError::NegativeAmount
            | TransactionError::NegativeQuantity
            | TransactionError::NegativeVatRate => Self::Validation(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
