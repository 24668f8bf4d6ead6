//! Chart of accounts.
//!
//! This module defines account types (IFRS chart sections with nominal code
//! ranges), the account entity, and the per-entity chart registry.

pub mod chart;
pub mod error;
pub mod types;

pub use chart::{Account, ChartOfAccounts};
pub use error::AccountError;
pub use types::{AccountType, NormalSide};
