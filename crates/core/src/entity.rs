//! Reporting entity (tenant) context.
//!
//! Every engine operation takes the entity explicitly; there is no ambient
//! tenant or user state.

use ifrs_shared::types::{AccountId, Currency, EntityId};
use serde::{Deserialize, Serialize};

/// A reporting entity (tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Entity name.
    pub name: String,
    /// Functional (reporting) currency.
    pub functional_currency: Currency,
    /// Account that receives exchange-rate differences on clearance.
    ///
    /// Required before multi-rate clearances can post.
    pub forex_account_id: Option<AccountId>,
    /// First month of the fiscal year (1 = January).
    pub year_start_month: u32,
}

impl Entity {
    /// Creates a new entity with a January fiscal year start.
    #[must_use]
    pub fn new(name: impl Into<String>, functional_currency: Currency) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            functional_currency,
            forex_account_id: None,
            year_start_month: 1,
        }
    }

    /// Sets the forex gain/loss account.
    #[must_use]
    pub fn with_forex_account(mut self, account_id: AccountId) -> Self {
        self.forex_account_id = Some(account_id);
        self
    }
}
