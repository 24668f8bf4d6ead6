//! Transaction line items and VAT charges.

use ifrs_shared::types::{AccountId, LineItemId, VatId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::currency::CurrencyService;

/// A VAT rate definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vat {
    /// Unique identifier.
    pub id: VatId,
    /// Short code (e.g., "VAT16").
    pub code: String,
    /// Rate name.
    pub name: String,
    /// Rate as a percentage (e.g., 16 for 16%).
    pub rate: Decimal,
    /// Account VAT amounts post to; required for non-zero rates.
    pub account_id: Option<AccountId>,
}

impl Vat {
    /// Creates a VAT rate definition.
    ///
    /// # Errors
    ///
    /// Returns `NegativeVatRate` for negative rates.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        rate: Decimal,
        account_id: Option<AccountId>,
    ) -> Result<Self, TransactionError> {
        if rate < Decimal::ZERO {
            return Err(TransactionError::NegativeVatRate);
        }
        Ok(Self {
            id: VatId::new(),
            code: code.into(),
            name: name.into(),
            rate,
            account_id,
        })
    }

    /// Zero-rated VAT.
    #[must_use]
    pub fn zero_rated() -> Self {
        Self {
            id: VatId::new(),
            code: "VAT0".to_string(),
            name: "Zero Rated".to_string(),
            rate: Decimal::ZERO,
            account_id: None,
        }
    }
}

/// A transaction line item: the "other side" of the double entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier.
    pub id: LineItemId,
    /// The account this line posts against.
    pub account_id: AccountId,
    /// Unit amount (transaction currency, strictly positive).
    pub amount: Decimal,
    /// Quantity (strictly positive).
    pub quantity: Decimal,
    /// Optional VAT charge.
    pub vat: Option<Vat>,
    /// Whether `amount` already includes VAT.
    pub vat_inclusive: bool,
    /// Optional narration for this line.
    pub narration: Option<String>,
}

impl LineItem {
    /// Creates a line item with quantity 1 and no VAT.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for zero or negative amounts.
    pub fn new(account_id: AccountId, amount: Decimal) -> Result<Self, TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::NegativeAmount);
        }
        Ok(Self {
            id: LineItemId::new(),
            account_id,
            amount,
            quantity: Decimal::ONE,
            vat: None,
            vat_inclusive: false,
            narration: None,
        })
    }

    /// Sets the quantity.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity` for zero or negative quantities.
    pub fn with_quantity(mut self, quantity: Decimal) -> Result<Self, TransactionError> {
        if quantity <= Decimal::ZERO {
            return Err(TransactionError::NegativeQuantity);
        }
        self.quantity = quantity;
        Ok(self)
    }

    /// Attaches a VAT charge.
    #[must_use]
    pub fn with_vat(mut self, vat: Vat, inclusive: bool) -> Self {
        self.vat = Some(vat);
        self.vat_inclusive = inclusive;
        self
    }

    /// Sets the narration.
    #[must_use]
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// Line total before VAT splitting: `amount * quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.amount * self.quantity
    }

    /// VAT portion of the line.
    ///
    /// For VAT-inclusive lines the tax is carved out of the total;
    /// otherwise it is charged on top.
    #[must_use]
    pub fn vat_amount(&self) -> Decimal {
        let Some(vat) = &self.vat else {
            return Decimal::ZERO;
        };
        if vat.rate.is_zero() {
            return Decimal::ZERO;
        }
        let hundred = Decimal::ONE_HUNDRED;
        let raw = if self.vat_inclusive {
            self.total() * vat.rate / (hundred + vat.rate)
        } else {
            self.total() * vat.rate / hundred
        };
        CurrencyService::round(raw, 4)
    }

    /// Net amount posted to the line account (excludes VAT).
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        if self.vat_inclusive {
            self.total() - self.vat_amount()
        } else {
            self.total()
        }
    }

    /// Gross amount carried by the main account (includes VAT).
    #[must_use]
    pub fn gross_amount(&self) -> Decimal {
        self.net_amount() + self.vat_amount()
    }
}
