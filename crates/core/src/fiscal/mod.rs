//! Reporting periods, posting gates, and opening balances.

pub mod error;
pub mod opening;
pub mod period;

pub use error::PeriodError;
pub use opening::{Balance, OpeningBalances};
pub use period::{PeriodCalendar, PeriodStatus, ReportingPeriod};
