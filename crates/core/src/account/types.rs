//! Account type classification.
//!
//! The chart of accounts is partitioned into fixed IFRS sections. Each
//! section owns a nominal code range; account codes are allocated inside
//! the section of their type.

use serde::{Deserialize, Serialize};

/// Normal balance side of an account.
///
/// In double-entry bookkeeping:
/// - Debit-normal accounts (assets, expenses) increase on debit
/// - Credit-normal accounts (liabilities, equity, revenue) increase on credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSide {
    /// Balance grows with debits.
    Debit,
    /// Balance grows with credits.
    Credit,
}

/// IFRS chart of accounts section.
///
/// The discriminants follow the conventional nominal code section starts,
/// so ordering account types orders their code ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Property, plant and equipment, long-term investments.
    NonCurrentAsset,
    /// Accumulated depreciation and other contra-asset accounts.
    ContraAsset,
    /// Stock on hand.
    Inventory,
    /// Cash and cash equivalents.
    Bank,
    /// Short-term assets other than cash and receivables.
    CurrentAsset,
    /// Amounts owed by clients.
    Receivable,
    /// Long-term debt.
    NonCurrentLiability,
    /// Tax and payroll control accounts.
    ControlAccount,
    /// Short-term liabilities other than payables.
    CurrentLiability,
    /// Amounts owed to suppliers.
    Payable,
    /// Owners' capital and reserves.
    Equity,
    /// Revenue from ordinary trading activities.
    OperatingRevenue,
    /// Cost of delivering ordinary trading activities.
    OperatingExpense,
    /// Interest, disposal gains and other incidental income.
    NonOperatingRevenue,
    /// Costs directly attributable to revenue.
    DirectExpense,
    /// Administration and establishment costs.
    OverheadExpense,
    /// Expenses outside normal operations.
    OtherExpense,
    /// Suspense and reconciliation entries.
    Reconciliation,
}

impl AccountType {
    /// All account types in chart (code range) order.
    pub const ALL: [Self; 18] = [
        Self::NonCurrentAsset,
        Self::ContraAsset,
        Self::Inventory,
        Self::Bank,
        Self::CurrentAsset,
        Self::Receivable,
        Self::NonCurrentLiability,
        Self::ControlAccount,
        Self::CurrentLiability,
        Self::Payable,
        Self::Equity,
        Self::OperatingRevenue,
        Self::OperatingExpense,
        Self::NonOperatingRevenue,
        Self::DirectExpense,
        Self::OverheadExpense,
        Self::OtherExpense,
        Self::Reconciliation,
    ];

    /// Start of this section's nominal code range.
    #[must_use]
    pub const fn section_start(self) -> i32 {
        match self {
            Self::NonCurrentAsset => 0,
            Self::ContraAsset => 10,
            Self::Inventory => 100,
            Self::Bank => 500,
            Self::CurrentAsset => 1000,
            Self::Receivable => 2000,
            Self::NonCurrentLiability => 2500,
            Self::ControlAccount => 4500,
            Self::CurrentLiability => 5000,
            Self::Payable => 6000,
            Self::Equity => 7000,
            Self::OperatingRevenue => 8000,
            Self::OperatingExpense => 9000,
            Self::NonOperatingRevenue => 10000,
            Self::DirectExpense => 11000,
            Self::OverheadExpense => 12000,
            Self::OtherExpense => 13000,
            Self::Reconciliation => 15000,
        }
    }

    /// Human-readable section name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NonCurrentAsset => "Non Current Asset",
            Self::ContraAsset => "Contra Asset",
            Self::Inventory => "Inventory",
            Self::Bank => "Bank",
            Self::CurrentAsset => "Current Asset",
            Self::Receivable => "Receivable",
            Self::NonCurrentLiability => "Non Current Liability",
            Self::ControlAccount => "Control Account",
            Self::CurrentLiability => "Current Liability",
            Self::Payable => "Payable",
            Self::Equity => "Equity",
            Self::OperatingRevenue => "Operating Revenue",
            Self::OperatingExpense => "Operating Expense",
            Self::NonOperatingRevenue => "Non Operating Revenue",
            Self::DirectExpense => "Direct Expense",
            Self::OverheadExpense => "Overhead Expense",
            Self::OtherExpense => "Other Expense",
            Self::Reconciliation => "Reconciliation",
        }
    }

    /// Normal balance side for accounts of this type.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::NonCurrentAsset
            | Self::ContraAsset
            | Self::Inventory
            | Self::Bank
            | Self::CurrentAsset
            | Self::Receivable
            | Self::OperatingExpense
            | Self::DirectExpense
            | Self::OverheadExpense
            | Self::OtherExpense => NormalSide::Debit,
            Self::NonCurrentLiability
            | Self::ControlAccount
            | Self::CurrentLiability
            | Self::Payable
            | Self::Equity
            | Self::OperatingRevenue
            | Self::NonOperatingRevenue
            | Self::Reconciliation => NormalSide::Credit,
        }
    }

    /// Returns true if this type appears on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        !self.is_income_statement()
    }

    /// Returns true if this type appears on the income statement.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(
            self,
            Self::OperatingRevenue
                | Self::OperatingExpense
                | Self::NonOperatingRevenue
                | Self::DirectExpense
                | Self::OverheadExpense
                | Self::OtherExpense
        )
    }

    /// Balance sheet asset section types.
    pub const ASSETS: [Self; 6] = [
        Self::NonCurrentAsset,
        Self::ContraAsset,
        Self::Inventory,
        Self::Bank,
        Self::CurrentAsset,
        Self::Receivable,
    ];

    /// Balance sheet liability section types.
    pub const LIABILITIES: [Self; 4] = [
        Self::NonCurrentLiability,
        Self::ControlAccount,
        Self::CurrentLiability,
        Self::Payable,
    ];

    /// Balance sheet equity section types.
    pub const EQUITY: [Self; 2] = [Self::Equity, Self::Reconciliation];

    /// Signed contribution of a (debit, credit) pair for this account type.
    ///
    /// Debit-normal accounts contribute `debit - credit`; credit-normal
    /// accounts contribute `credit - debit`.
    #[must_use]
    pub fn signed_contribution(
        self,
        debit: rust_decimal::Decimal,
        credit: rust_decimal::Decimal,
    ) -> rust_decimal::Decimal {
        match self.normal_side() {
            NormalSide::Debit => debit - credit,
            NormalSide::Credit => credit - debit,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_section_starts_are_ordered() {
        let starts: Vec<i32> = AccountType::ALL.iter().map(|t| t.section_start()).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_normal_sides() {
        assert_eq!(AccountType::Bank.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Receivable.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::OverheadExpense.normal_side(), NormalSide::Debit);
        assert_eq!(AccountType::Payable.normal_side(), NormalSide::Credit);
        assert_eq!(AccountType::Equity.normal_side(), NormalSide::Credit);
        assert_eq!(
            AccountType::OperatingRevenue.normal_side(),
            NormalSide::Credit
        );
    }

    #[test]
    fn test_statement_membership() {
        assert!(AccountType::Bank.is_balance_sheet());
        assert!(!AccountType::Bank.is_income_statement());
        assert!(AccountType::OperatingRevenue.is_income_statement());
        assert!(!AccountType::OperatingRevenue.is_balance_sheet());
    }

    #[test]
    fn test_signed_contribution() {
        // Debit-normal: debit - credit
        assert_eq!(
            AccountType::Bank.signed_contribution(dec!(100), dec!(30)),
            dec!(70)
        );
        // Credit-normal: credit - debit
        assert_eq!(
            AccountType::Payable.signed_contribution(dec!(30), dec!(100)),
            dec!(70)
        );
    }

    #[test]
    fn test_statement_sections_cover_balance_sheet_types() {
        let mut covered: Vec<AccountType> = AccountType::ASSETS.to_vec();
        covered.extend(AccountType::LIABILITIES);
        covered.extend(AccountType::EQUITY);

        for ty in AccountType::ALL {
            assert_eq!(
                covered.contains(&ty),
                ty.is_balance_sheet(),
                "{ty} section membership mismatch"
            );
        }
    }
}
