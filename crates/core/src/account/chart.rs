//! Accounts and the chart of accounts registry.

use std::collections::{BTreeMap, HashMap};

use ifrs_shared::types::{AccountId, Currency, EntityId};
use serde::{Deserialize, Serialize};

use super::error::AccountError;
use super::types::AccountType;

/// A chart of accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Entity this account belongs to.
    pub entity_id: EntityId,
    /// Nominal code within the type's section range.
    pub code: i32,
    /// Account name.
    pub name: String,
    /// IFRS chart section.
    pub account_type: AccountType,
    /// Account currency.
    pub currency: Currency,
}

/// Chart of accounts for a single entity.
///
/// Allocates nominal codes inside each type's section range and enforces
/// code uniqueness. Account type changes are gated by the caller on whether
/// ledger entries exist (the chart itself has no journal knowledge).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
    by_code: BTreeMap<i32, AccountId>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account, allocating the next free code in its section.
    ///
    /// # Errors
    ///
    /// Returns `SectionExhausted` if the section's code range is full.
    pub fn add(
        &mut self,
        entity_id: EntityId,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<AccountId, AccountError> {
        let code = self.next_code(account_type)?;
        self.add_with_code(entity_id, name, account_type, currency, code)
    }

    /// Adds an account with an explicit nominal code.
    ///
    /// # Errors
    ///
    /// Returns `CodeOutOfSection` if the code is outside the type's range,
    /// or `DuplicateCode` if the code is taken.
    pub fn add_with_code(
        &mut self,
        entity_id: EntityId,
        name: impl Into<String>,
        account_type: AccountType,
        currency: Currency,
        code: i32,
    ) -> Result<AccountId, AccountError> {
        let (start, end) = Self::section_range(account_type);
        if code < start || code >= end {
            return Err(AccountError::CodeOutOfSection { code, account_type });
        }
        if self.by_code.contains_key(&code) {
            return Err(AccountError::DuplicateCode(code));
        }

        let account = Account {
            id: AccountId::new(),
            entity_id,
            code,
            name: name.into(),
            account_type,
            currency,
        };
        let id = account.id;
        self.by_code.insert(code, id);
        self.accounts.insert(id, account);
        Ok(id)
    }

    /// Looks up an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn get(&self, id: AccountId) -> Result<&Account, AccountError> {
        self.accounts
            .get(&id)
            .ok_or(AccountError::AccountNotFound(id))
    }

    /// Looks up an account by nominal code.
    #[must_use]
    pub fn by_code(&self, code: i32) -> Option<&Account> {
        self.by_code.get(&code).and_then(|id| self.accounts.get(id))
    }

    /// Changes an account's type.
    ///
    /// The caller supplies whether the account already has ledger entries;
    /// type changes are forbidden once it does. The account keeps its code
    /// only if the code fits the new section; otherwise a fresh code is
    /// allocated.
    ///
    /// # Errors
    ///
    /// Returns `TypeChangeNotAllowed` when entries exist, or a code
    /// allocation error.
    pub fn change_type(
        &mut self,
        id: AccountId,
        new_type: AccountType,
        has_ledger_entries: bool,
    ) -> Result<(), AccountError> {
        if has_ledger_entries {
            return Err(AccountError::TypeChangeNotAllowed(id));
        }
        let current_code = self.get(id)?.code;

        let (start, end) = Self::section_range(new_type);
        let code = if current_code >= start && current_code < end {
            current_code
        } else {
            let new_code = self.next_code(new_type)?;
            self.by_code.remove(&current_code);
            self.by_code.insert(new_code, id);
            new_code
        };

        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound(id))?;
        account.account_type = new_type;
        account.code = code;
        Ok(())
    }

    /// Iterates over all accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.by_code.values().filter_map(|id| self.accounts.get(id))
    }

    /// Accounts of the given type, in code order.
    pub fn of_type(&self, account_type: AccountType) -> impl Iterator<Item = &Account> {
        self.iter().filter(move |a| a.account_type == account_type)
    }

    /// Number of accounts in the chart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Half-open `[start, end)` code range of a section.
    fn section_range(account_type: AccountType) -> (i32, i32) {
        let start = account_type.section_start();
        let end = AccountType::ALL
            .iter()
            .map(|t| t.section_start())
            .filter(|&s| s > start)
            .min()
            .unwrap_or(i32::MAX);
        (start, end)
    }

    /// Next free code in a section.
    fn next_code(&self, account_type: AccountType) -> Result<i32, AccountError> {
        let (start, end) = Self::section_range(account_type);
        let mut candidate = start + 1;
        for (&code, _) in self.by_code.range(start..end) {
            if code > candidate {
                break;
            }
            if code == candidate {
                candidate += 1;
            }
        }
        if candidate >= end {
            return Err(AccountError::SectionExhausted(account_type));
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    #[test]
    fn test_add_allocates_sequential_codes() {
        let mut chart = ChartOfAccounts::new();
        let entity = EntityId::new();

        let a = chart
            .add(entity, "Trade Debtors", AccountType::Receivable, usd())
            .unwrap();
        let b = chart
            .add(entity, "Other Debtors", AccountType::Receivable, usd())
            .unwrap();

        assert_eq!(chart.get(a).unwrap().code, 2001);
        assert_eq!(chart.get(b).unwrap().code, 2002);
    }

    #[test]
    fn test_add_with_explicit_code() {
        let mut chart = ChartOfAccounts::new();
        let entity = EntityId::new();

        chart
            .add_with_code(entity, "Main Bank", AccountType::Bank, usd(), 510)
            .unwrap();
        assert_eq!(chart.by_code(510).unwrap().name, "Main Bank");

        // Next auto allocation skips nothing below the explicit code.
        let id = chart
            .add(entity, "Petty Cash", AccountType::Bank, usd())
            .unwrap();
        assert_eq!(chart.get(id).unwrap().code, 501);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let mut chart = ChartOfAccounts::new();
        let entity = EntityId::new();

        chart
            .add_with_code(entity, "Bank A", AccountType::Bank, usd(), 501)
            .unwrap();
        let err = chart
            .add_with_code(entity, "Bank B", AccountType::Bank, usd(), 501)
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateCode(501)));
    }

    #[test]
    fn test_code_out_of_section_rejected() {
        let mut chart = ChartOfAccounts::new();
        let err = chart
            .add_with_code(
                EntityId::new(),
                "Bad",
                AccountType::Receivable,
                usd(),
                9001,
            )
            .unwrap_err();
        assert!(matches!(err, AccountError::CodeOutOfSection { .. }));
    }

    #[test]
    fn test_change_type_without_entries() {
        let mut chart = ChartOfAccounts::new();
        let id = chart
            .add(EntityId::new(), "Misc", AccountType::CurrentAsset, usd())
            .unwrap();

        chart.change_type(id, AccountType::Receivable, false).unwrap();
        let account = chart.get(id).unwrap();
        assert_eq!(account.account_type, AccountType::Receivable);
        // Old code 1001 is outside the receivable section, so it moved.
        assert_eq!(account.code, 2001);
    }

    #[test]
    fn test_change_type_with_entries_rejected() {
        let mut chart = ChartOfAccounts::new();
        let id = chart
            .add(EntityId::new(), "Debtors", AccountType::Receivable, usd())
            .unwrap();

        let err = chart
            .change_type(id, AccountType::Payable, true)
            .unwrap_err();
        assert!(matches!(err, AccountError::TypeChangeNotAllowed(_)));
    }

    #[test]
    fn test_of_type_iterates_in_code_order() {
        let mut chart = ChartOfAccounts::new();
        let entity = EntityId::new();
        chart
            .add_with_code(entity, "B", AccountType::Bank, usd(), 502)
            .unwrap();
        chart
            .add_with_code(entity, "A", AccountType::Bank, usd(), 501)
            .unwrap();

        let codes: Vec<i32> = chart.of_type(AccountType::Bank).map(|a| a.code).collect();
        assert_eq!(codes, vec![501, 502]);
    }
}
