//! Report error types.

use ifrs_shared::types::AccountId;
use thiserror::Error;

use crate::account::AccountType;

/// Errors that can occur while building reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Aging schedules only cover receivables and payables.
    #[error("No aging schedule for {0} accounts")]
    UnsupportedAgingType(AccountType),

    /// The report window is inverted.
    #[error("Report window starts {from} after it ends {to}")]
    InvalidWindow {
        /// Window start.
        from: chrono::NaiveDate,
        /// Window end.
        to: chrono::NaiveDate,
    },
}

impl ReportError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UnsupportedAgingType(_) => "UNSUPPORTED_AGING_TYPE",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
        }
    }
}

impl From<ReportError> for ifrs_shared::AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::InvalidWindow { .. } => Self::Validation(err.to_string()),
            ReportError::UnsupportedAgingType(_) => Self::BusinessRule(err.to_string()),
        }
    }
}
