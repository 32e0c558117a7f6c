use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan account
pub type LoanId = Uuid;

/// loan account status
///
/// Transitions are one-directional: Open → Closed on full settlement,
/// Open → Matured is a derived read when today is past the maturity date,
/// Matured → Auctioned is an explicit external action. A Closed loan never
/// accepts new receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// loan active, ledger grows with each receipt
    Open,
    /// both interest and principal balances reached zero
    Closed,
    /// past maturity date and still open (derived, not stored)
    Matured,
    /// pledged items sent to auction
    Auctioned,
}

/// read-only interest quote for a till date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestQuote {
    pub outstanding_principal: Money,
    /// newly accrued + carry-in + penalty, what a receipt would have to cover
    pub outstanding_interest: Money,
    /// interest accrued over the quoted window alone
    pub interest_accrued: Money,
    /// unpaid interest carried in from the previous period
    pub carry_in_interest: Money,
    /// penalty charged on the carry-in, zero unless the scheme configures one
    pub penalty_interest: Money,
    pub days_calculated: i64,
    pub min_calc_days_applied: bool,
}

impl InterestQuote {
    pub fn total_outstanding(&self) -> Money {
        self.outstanding_principal + self.outstanding_interest
    }
}

/// signed adjustments applied to the interest-due side of a receipt
///
/// Amounts are stored unsigned; the field name carries the sign (credits
/// reduce the net payable, the rest increase it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Adjustments {
    pub other_credits: Money,
    pub other_debits: Money,
    pub default_amount: Money,
    pub add_less: Money,
}

impl Adjustments {
    /// net effect on the amount billed to the operator
    pub fn net(&self) -> Money {
        self.other_debits + self.default_amount + self.add_less - self.other_credits
    }
}

/// how a collection amount was split between interest and principal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub balance_interest: Money,
    pub balance_principal: Money,
    /// interest due after adjustments, what the operator was billed
    pub net_payable: Money,
    /// collection the split could not absorb; the caller rejects a receipt
    /// that leaves any
    pub excess: Money,
}

impl PaymentSplit {
    pub fn is_full_settlement(&self) -> bool {
        self.balance_interest.is_zero() && self.balance_principal.is_zero()
    }
}

/// a single payment-mode row on a receipt (cash, cheque, transfer, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentModeEntry {
    pub mode: PaymentMode,
    pub amount: Money,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Cheque,
    Transfer,
    Upi,
}

/// charges collected upfront at loan issuance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginationCharges {
    /// interest collected in advance for the scheme's advance months
    pub advance_interest: Money,
    pub processing_fee: Money,
}

impl OriginationCharges {
    pub fn total(&self) -> Money {
        self.advance_interest + self.processing_fee
    }
}

/// fraction of a year represented by a whole number of days (365-day year)
pub(crate) fn year_fraction(days: i64) -> Decimal {
    Decimal::from(days) / Decimal::from(365)
}
