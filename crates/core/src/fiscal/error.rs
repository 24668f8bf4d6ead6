//! Reporting period and opening balance error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during reporting period operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// No reporting period covers the given date.
    #[error("No reporting period found for date {0}")]
    NoReportingPeriod(NaiveDate),

    /// No reporting period exists for the given calendar year.
    #[error("No reporting period found for year {0}")]
    NoPeriodForYear(i32),

    /// A reporting period already exists for the year.
    #[error("Reporting period for {0} already exists")]
    DuplicatePeriod(i32),

    /// The fiscal year start does not form a valid date.
    #[error("Cannot start reporting period {calendar_year} in month {month}")]
    InvalidPeriodStart {
        /// Calendar year of the rejected period.
        calendar_year: i32,
        /// Fiscal year start month.
        month: u32,
    },

    /// Reporting period is closed; nothing may post.
    #[error("Reporting period {0} is closed")]
    ClosedReportingPeriod(i32),

    /// Reporting period is adjusting; only journal entries may post.
    #[error("Reporting period {0} is adjusting; only journal entries may post")]
    AdjustingReportingPeriod(i32),

    /// Closed periods cannot be reopened.
    #[error("Reporting period {0} is closed and cannot be reopened")]
    CannotReopenPeriod(i32),

    /// Opening balance must be dated before the period start.
    #[error("Opening balance date {date} is not before period start {period_start}")]
    InvalidBalanceDate {
        /// The rejected balance date.
        date: NaiveDate,
        /// First day of the reporting period.
        period_start: NaiveDate,
    },

    /// Opening balance amount must be positive.
    #[error("Opening balance amount must be positive")]
    NegativeBalanceAmount,
}

impl PeriodError {
    /// Returns the error code for host-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoReportingPeriod(_) => "NO_REPORTING_PERIOD",
            Self::NoPeriodForYear(_) => "NO_PERIOD_FOR_YEAR",
            Self::DuplicatePeriod(_) => "DUPLICATE_PERIOD",
            Self::InvalidPeriodStart { .. } => "INVALID_PERIOD_START",
            Self::ClosedReportingPeriod(_) => "CLOSED_REPORTING_PERIOD",
            Self::AdjustingReportingPeriod(_) => "ADJUSTING_REPORTING_PERIOD",
            Self::CannotReopenPeriod(_) => "CANNOT_REOPEN_PERIOD",
            Self::InvalidBalanceDate { .. } => "INVALID_BALANCE_DATE",
            Self::NegativeBalanceAmount => "NEGATIVE_BALANCE_AMOUNT",
        }
    }
}

impl From<PeriodError> for ifrs_shared::AppError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::NoReportingPeriod(_) | PeriodError::NoPeriodForYear(_) => {
                Self::NotFound(err.to_string())
            }
            PeriodError::DuplicatePeriod(_) => Self::Conflict(err.to_string()),
            PeriodError::InvalidPeriodStart { .. }
            | PeriodError::InvalidBalanceDate { .. }
            | PeriodError::NegativeBalanceAmount => Self::Validation(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
