//! Reporting periods (fiscal years) and the posting calendar.

use chrono::{Datelike, NaiveDate};
use ifrs_shared::types::{EntityId, ReportingPeriodId};
use serde::{Deserialize, Serialize};

use super::error::PeriodError;
use crate::entity::Entity;
use crate::transaction::types::TransactionType;

/// Status of a reporting period, gating which transaction types may post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Period is open - all transaction types may post.
    Open,
    /// Period is adjusting - only journal entries may post.
    Adjusting,
    /// Period is closed - no posting allowed.
    Closed,
}

impl PeriodStatus {
    /// Returns true if the period allows any posting.
    #[must_use]
    pub fn allows_posting(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// A reporting period: one fiscal year of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Unique identifier.
    pub id: ReportingPeriodId,
    /// Entity this period belongs to.
    pub entity_id: EntityId,
    /// Calendar year the period starts in.
    pub calendar_year: i32,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl ReportingPeriod {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Validates that a transaction of the given type may post on this
    /// period's dates.
    ///
    /// # Errors
    ///
    /// Returns `ClosedReportingPeriod` for closed periods, and
    /// `AdjustingReportingPeriod` for non-journal postings into an
    /// adjusting period.
    pub fn validate_posting(&self, transaction_type: TransactionType) -> Result<(), PeriodError> {
        match self.status {
            PeriodStatus::Open => Ok(()),
            PeriodStatus::Adjusting => {
                if transaction_type == TransactionType::JournalEntry {
                    Ok(())
                } else {
                    Err(PeriodError::AdjustingReportingPeriod(self.calendar_year))
                }
            }
            PeriodStatus::Closed => Err(PeriodError::ClosedReportingPeriod(self.calendar_year)),
        }
    }
}

/// The set of reporting periods for one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodCalendar {
    periods: Vec<ReportingPeriod>,
}

impl PeriodCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the reporting period starting in the given calendar year.
    ///
    /// The period runs twelve months from the entity's fiscal year start
    /// month.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePeriod` if the year already has a period, and
    /// `InvalidPeriodStart` if the entity's fiscal year start month does
    /// not form a valid date in that year.
    pub fn add_year(
        &mut self,
        entity: &Entity,
        calendar_year: i32,
    ) -> Result<ReportingPeriodId, PeriodError> {
        if self.periods.iter().any(|p| p.calendar_year == calendar_year) {
            return Err(PeriodError::DuplicatePeriod(calendar_year));
        }

        let month = entity.year_start_month;
        let invalid_start = || PeriodError::InvalidPeriodStart {
            calendar_year,
            month,
        };

        // Twelve months from the fiscal year start; day before next start.
        let start_date =
            NaiveDate::from_ymd_opt(calendar_year, month, 1).ok_or_else(invalid_start)?;
        let end_date = NaiveDate::from_ymd_opt(calendar_year + 1, month, 1)
            .and_then(|next_start| next_start.pred_opt())
            .ok_or_else(invalid_start)?;

        let id = ReportingPeriodId::new();
        self.periods.push(ReportingPeriod {
            id,
            entity_id: entity.id,
            calendar_year,
            start_date,
            end_date,
            status: PeriodStatus::Open,
        });
        Ok(id)
    }

    /// Returns the period covering the given date.
    ///
    /// # Errors
    ///
    /// Returns `NoReportingPeriod` if no period covers the date.
    pub fn period_for(&self, date: NaiveDate) -> Result<&ReportingPeriod, PeriodError> {
        self.periods
            .iter()
            .find(|p| p.contains_date(date))
            .ok_or(PeriodError::NoReportingPeriod(date))
    }

    /// Returns the period by ID.
    #[must_use]
    pub fn get(&self, id: ReportingPeriodId) -> Option<&ReportingPeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    /// Returns the calendar year of a date under this calendar.
    ///
    /// Falls back to the date's own year when no period covers it.
    #[must_use]
    pub fn year_of(&self, date: NaiveDate) -> i32 {
        self.period_for(date)
            .map_or_else(|_| date.year(), |p| p.calendar_year)
    }

    /// Moves a period to a new status.
    ///
    /// Closed periods cannot leave the closed state.
    ///
    /// # Errors
    ///
    /// Returns `CannotReopenPeriod` when reopening a closed period, or
    /// `NoPeriodForYear` if the year has no period.
    pub fn set_status(
        &mut self,
        calendar_year: i32,
        status: PeriodStatus,
    ) -> Result<(), PeriodError> {
        let period = self
            .periods
            .iter_mut()
            .find(|p| p.calendar_year == calendar_year)
            .ok_or(PeriodError::NoPeriodForYear(calendar_year))?;

        if period.status == PeriodStatus::Closed && status != PeriodStatus::Closed {
            return Err(PeriodError::CannotReopenPeriod(calendar_year));
        }
        period.status = status;
        Ok(())
    }

    /// Iterates over all periods in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ReportingPeriod> {
        self.periods.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs_shared::types::Currency;

    fn entity() -> Entity {
        Entity::new("Test Ltd", Currency::new("USD").unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_year_spans_calendar_year() {
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&entity(), 2026).unwrap();

        let period = calendar.period_for(date(2026, 6, 15)).unwrap();
        assert_eq!(period.start_date, date(2026, 1, 1));
        assert_eq!(period.end_date, date(2026, 12, 31));
        assert_eq!(period.status, PeriodStatus::Open);
    }

    #[test]
    fn test_add_year_respects_fiscal_start_month() {
        let mut e = entity();
        e.year_start_month = 4;
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&e, 2026).unwrap();

        let period = calendar.period_for(date(2026, 4, 1)).unwrap();
        assert_eq!(period.start_date, date(2026, 4, 1));
        assert_eq!(period.end_date, date(2027, 3, 31));
        // January 2026 belongs to the prior fiscal year, which has no period.
        assert!(calendar.period_for(date(2026, 1, 15)).is_err());
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let mut calendar = PeriodCalendar::new();
        let e = entity();
        calendar.add_year(&e, 2026).unwrap();
        assert!(matches!(
            calendar.add_year(&e, 2026),
            Err(PeriodError::DuplicatePeriod(2026))
        ));
    }

    #[test]
    fn test_posting_gates() {
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&entity(), 2026).unwrap();

        let period = calendar.period_for(date(2026, 3, 1)).unwrap().clone();
        assert!(period.validate_posting(TransactionType::ClientInvoice).is_ok());

        let mut adjusting = period.clone();
        adjusting.status = PeriodStatus::Adjusting;
        assert!(adjusting
            .validate_posting(TransactionType::JournalEntry)
            .is_ok());
        assert!(matches!(
            adjusting.validate_posting(TransactionType::ClientInvoice),
            Err(PeriodError::AdjustingReportingPeriod(2026))
        ));

        let mut closed = period;
        closed.status = PeriodStatus::Closed;
        assert!(matches!(
            closed.validate_posting(TransactionType::JournalEntry),
            Err(PeriodError::ClosedReportingPeriod(2026))
        ));
    }

    #[test]
    fn test_closed_period_cannot_reopen() {
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&entity(), 2026).unwrap();
        calendar.set_status(2026, PeriodStatus::Closed).unwrap();

        assert!(matches!(
            calendar.set_status(2026, PeriodStatus::Open),
            Err(PeriodError::CannotReopenPeriod(2026))
        ));
        // Closed -> Closed is a no-op, not a reopen.
        assert!(calendar.set_status(2026, PeriodStatus::Closed).is_ok());
    }

    #[test]
    fn test_year_of() {
        let mut calendar = PeriodCalendar::new();
        calendar.add_year(&entity(), 2026).unwrap();
        assert_eq!(calendar.year_of(date(2026, 7, 1)), 2026);
        // No period covers 2024; falls back to the date's own year.
        assert_eq!(calendar.year_of(date(2024, 7, 1)), 2024);
    }
}
