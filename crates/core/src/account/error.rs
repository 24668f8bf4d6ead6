//! Chart of accounts error types.

use ifrs_shared::types::AccountId;
use thiserror::Error;

use super::types::AccountType;

/// Errors that can occur when maintaining the chart of accounts.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found in the chart.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account code is already taken.
    #[error("Account code {0} is already in use")]
    DuplicateCode(i32),

    /// Account code falls outside its type's section range.
    #[error("Account code {code} is outside the {account_type} section")]
    CodeOutOfSection {
        /// The offending code.
        code: i32,
        /// The section the account belongs to.
        account_type: AccountType,
    },

    /// The section has no free codes left.
    #[error("No free account codes left in the {0} section")]
    SectionExhausted(AccountType),

    /// Account type cannot be changed because ledger entries exist.
    #[error("Cannot change account type for account {0} because it has ledger entries")]
    TypeChangeNotAllowed(AccountId),
}

impl AccountError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::CodeOutOfSection { .. } => "CODE_OUT_OF_SECTION",
            Self::SectionExhausted(_) => "SECTION_EXHAUSTED",
            Self::TypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
        }
    }
}

impl From<AccountError> for ifrs_shared::AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            AccountError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            AccountError::CodeOutOfSection { .. } | AccountError::SectionExhausted(_) => {
                Self::Validation(err.to_string())
            }
            AccountError::TypeChangeNotAllowed(_) => Self::BusinessRule(err.to_string()),
        }
    }
}
