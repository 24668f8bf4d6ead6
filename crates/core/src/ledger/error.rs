//! Ledger and posting error types.

use ifrs_shared::types::{AccountId, EntityId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountType;
use crate::fiscal::PeriodError;
use crate::transaction::{TransactionError, TransactionType};

/// Errors raised by the journal itself.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Commits must carry at least one row.
    #[error("Cannot commit an empty ledger batch")]
    EmptyBatch,

    /// Functional debits and credits must match per transaction.
    #[error("Unbalanced posting: debits {debits} do not equal credits {credits}")]
    UnbalancedPosting {
        /// Total functional debits in the batch.
        debits: Decimal,
        /// Total functional credits in the batch.
        credits: Decimal,
    },

    /// Ledger amounts are strictly positive; direction lives in the
    /// entry type.
    #[error("Ledger amounts must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The hash chain no longer matches the row contents.
    #[error("Ledger hash chain corrupted at row {index}")]
    HashChainCorrupted {
        /// Index of the first corrupted row.
        index: usize,
    },

    /// An optimistic version guard failed.
    #[error("Account {account_id} version mismatch: expected {expected}, found {actual}")]
    AccountVersionMismatch {
        /// The guarded account.
        account_id: AccountId,
        /// Version the caller expected.
        expected: u64,
        /// Version actually recorded.
        actual: u64,
    },
}

impl LedgerError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::UnbalancedPosting { .. } => "UNBALANCED_POSTING",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::HashChainCorrupted { .. } => "HASH_CHAIN_CORRUPTED",
            Self::AccountVersionMismatch { .. } => "ACCOUNT_VERSION_MISMATCH",
        }
    }
}

impl From<LedgerError> for ifrs_shared::AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountVersionMismatch { .. } => Self::Conflict(err.to_string()),
            LedgerError::HashChainCorrupted { .. } => Self::Internal(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}

/// Errors raised while posting a transaction.
#[derive(Debug, Error)]
pub enum PostingError {
    /// Transaction-level rule violated.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Reporting period gate failed.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Journal-level rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Referenced account does not exist in the chart.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The transaction belongs to a different entity than the books.
    #[error("Transaction {transaction_id} belongs to entity {transaction_entity}, not {ledger_entity}")]
    EntityMismatch {
        /// The transaction being posted.
        transaction_id: TransactionId,
        /// Entity on the transaction.
        transaction_entity: EntityId,
        /// Entity owning the books.
        ledger_entity: EntityId,
    },

    /// The main account's type is not allowed for this transaction type.
    #[error("{account_type} is not a valid main account type for a {transaction_type}")]
    InvalidMainAccountType {
        /// The offending transaction type.
        transaction_type: TransactionType,
        /// The main account's type.
        account_type: AccountType,
    },

    /// A line item account's type is not allowed for this transaction
    /// type.
    #[error("{account_type} is not a valid line item account type for a {transaction_type}")]
    InvalidLineItemAccountType {
        /// The offending transaction type.
        transaction_type: TransactionType,
        /// The line account's type.
        account_type: AccountType,
    },

    /// A non-zero VAT rate needs an account to post the tax to.
    #[error("VAT rate {vat_code} has no account to post to")]
    MissingVatAccount {
        /// Code of the offending VAT rate.
        vat_code: String,
    },
}

impl PostingError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transaction(err) => err.error_code(),
            Self::Period(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntityMismatch { .. } => "ENTITY_MISMATCH",
            Self::InvalidMainAccountType { .. } => "INVALID_MAIN_ACCOUNT_TYPE",
            Self::InvalidLineItemAccountType { .. } => "INVALID_LINE_ITEM_ACCOUNT_TYPE",
            Self::MissingVatAccount { .. } => "MISSING_VAT_ACCOUNT",
        }
    }
}

impl From<PostingError> for ifrs_shared::AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Transaction(inner) => inner.into(),
            PostingError::Period(inner) => inner.into(),
            PostingError::Ledger(inner) => inner.into(),
            PostingError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
