//! Transaction type classification and posting rules.
//!
//! Each transaction subtype fixes which account types its main account and
//! line items may use, which side of the entry the main account takes, and
//! whether it participates in clearance as the cleared or clearing side.
//! This is the enum-dispatch replacement for per-type subclassing.

use serde::{Deserialize, Serialize};

use crate::account::AccountType;

/// Transaction type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Sale on credit to a client.
    ClientInvoice,
    /// Sale settled immediately through a bank account.
    CashSale,
    /// Money received from a client against outstanding invoices.
    ClientReceipt,
    /// Reduction of a client's outstanding balance.
    CreditNote,
    /// Purchase on credit from a supplier.
    SupplierBill,
    /// Purchase settled immediately through a bank account.
    CashPurchase,
    /// Money paid to a supplier against outstanding bills.
    SupplierPayment,
    /// Reduction of a supplier's outstanding balance.
    DebitNote,
    /// Transfer between bank accounts.
    ContraEntry,
    /// General journal entry.
    JournalEntry,
}

impl TransactionType {
    /// All transaction types.
    pub const ALL: [Self; 10] = [
        Self::ClientInvoice,
        Self::CashSale,
        Self::ClientReceipt,
        Self::CreditNote,
        Self::SupplierBill,
        Self::CashPurchase,
        Self::SupplierPayment,
        Self::DebitNote,
        Self::ContraEntry,
        Self::JournalEntry,
    ];

    /// Two-letter reference number prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ClientInvoice => "IN",
            Self::CashSale => "CS",
            Self::ClientReceipt => "RC",
            Self::CreditNote => "CN",
            Self::SupplierBill => "BL",
            Self::CashPurchase => "CP",
            Self::SupplierPayment => "PY",
            Self::DebitNote => "DN",
            Self::ContraEntry => "CE",
            Self::JournalEntry => "JN",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClientInvoice => "Client Invoice",
            Self::CashSale => "Cash Sale",
            Self::ClientReceipt => "Client Receipt",
            Self::CreditNote => "Credit Note",
            Self::SupplierBill => "Supplier Bill",
            Self::CashPurchase => "Cash Purchase",
            Self::SupplierPayment => "Supplier Payment",
            Self::DebitNote => "Debit Note",
            Self::ContraEntry => "Contra Entry",
            Self::JournalEntry => "Journal Entry",
        }
    }

    /// Account types allowed for the main account, or `None` for any.
    #[must_use]
    pub const fn main_account_types(self) -> Option<&'static [AccountType]> {
        match self {
            Self::ClientInvoice | Self::ClientReceipt | Self::CreditNote => {
                Some(&[AccountType::Receivable])
            }
            Self::SupplierBill | Self::SupplierPayment | Self::DebitNote => {
                Some(&[AccountType::Payable])
            }
            Self::CashSale | Self::CashPurchase | Self::ContraEntry => Some(&[AccountType::Bank]),
            Self::JournalEntry => None,
        }
    }

    /// Account types allowed for line items, or `None` for any.
    #[must_use]
    pub const fn line_item_account_types(self) -> Option<&'static [AccountType]> {
        match self {
            Self::ClientInvoice | Self::CashSale | Self::CreditNote => {
                Some(&[AccountType::OperatingRevenue])
            }
            Self::SupplierBill | Self::CashPurchase | Self::DebitNote => Some(&[
                AccountType::OperatingExpense,
                AccountType::DirectExpense,
                AccountType::OverheadExpense,
                AccountType::OtherExpense,
                AccountType::NonCurrentAsset,
                AccountType::CurrentAsset,
                AccountType::Inventory,
            ]),
            Self::ClientReceipt | Self::SupplierPayment | Self::ContraEntry => {
                Some(&[AccountType::Bank])
            }
            Self::JournalEntry => None,
        }
    }

    /// Default entry side of the main account.
    ///
    /// `true` means the main account is credited and line items are
    /// debited. Only journal entries may override this.
    #[must_use]
    pub const fn main_account_credited(self) -> bool {
        match self {
            Self::ClientInvoice
            | Self::CashSale
            | Self::SupplierPayment
            | Self::DebitNote
            | Self::ContraEntry => false,
            Self::ClientReceipt
            | Self::CreditNote
            | Self::SupplierBill
            | Self::CashPurchase
            | Self::JournalEntry => true,
        }
    }

    /// Returns true if transactions of this type can be cleared by others.
    #[must_use]
    pub const fn is_clearable(self) -> bool {
        matches!(
            self,
            Self::ClientInvoice | Self::SupplierBill | Self::JournalEntry
        )
    }

    /// Returns true if transactions of this type can clear others.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        matches!(
            self,
            Self::ClientReceipt
                | Self::SupplierPayment
                | Self::CreditNote
                | Self::DebitNote
                | Self::JournalEntry
        )
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
