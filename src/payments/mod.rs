//! receipt intake and collection allocation

pub mod allocation;

pub use allocation::PaymentAllocator;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{Adjustments, PaymentModeEntry};

/// an operator's receipt: settle interest till a date, collect an amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    /// date interest is settled up to, exclusive of further accrual
    pub till_date: NaiveDate,
    /// total amount collected across all payment modes
    pub collection: Money,
    #[serde(default)]
    pub adjustments: Adjustments,
    /// extra principal pledged with this receipt, effective from the next
    /// period
    #[serde(default)]
    pub added_principal: Money,
    /// principal written down with this receipt
    #[serde(default)]
    pub adjusted_principal: Money,
    /// how the collection was tendered; must sum to the collection amount
    pub modes: Vec<PaymentModeEntry>,
    pub reference: Option<String>,
}

impl ReceiptRequest {
    pub fn new(till_date: NaiveDate, collection: Money) -> Self {
        Self {
            till_date,
            collection,
            adjustments: Adjustments::default(),
            added_principal: Money::ZERO,
            adjusted_principal: Money::ZERO,
            modes: Vec::new(),
            reference: None,
        }
    }

    pub fn with_adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_modes(mut self, modes: Vec<PaymentModeEntry>) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_added_principal(mut self, amount: Money) -> Self {
        self.added_principal = amount;
        self
    }

    pub fn with_adjusted_principal(mut self, amount: Money) -> Self {
        self.adjusted_principal = amount;
        self
    }

    /// reject a negative collection or a mode breakdown that does not add up
    ///
    /// A request without mode rows is accepted as-is; when rows are present
    /// their sum must match the collection to within one paisa.
    pub fn validate(&self) -> Result<()> {
        if self.collection.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: self.collection,
            });
        }
        if self.added_principal.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: self.added_principal,
            });
        }
        if self.adjusted_principal.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: self.adjusted_principal,
            });
        }

        if !self.modes.is_empty() {
            let modes_total = self
                .modes
                .iter()
                .fold(Money::ZERO, |acc, entry| acc + entry.amount);
            let gap = (modes_total - self.collection).abs();
            if gap.as_decimal() > dec!(0.01) {
                return Err(LedgerError::PaymentModeMismatch {
                    modes_total,
                    collection: self.collection,
                });
            }
        }

        Ok(())
    }
}
