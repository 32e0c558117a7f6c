use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::OriginationCharges;

/// interest calculation method for a scheme
///
/// A closed set: adding a method is a compile-time-checked change in the
/// accrual engine, not a string compare scattered across callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestMethod {
    Simple,
    Compound,
    Emi,
    Multiple,
    Customized,
}

/// compounding frequency for compound-method schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl CompoundingFrequency {
    /// get number of compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Weekly => 52,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::SemiAnnual => 2,
            CompoundingFrequency::Annual => 1,
        }
    }
}

/// named house styles for customized-method schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomizedStyle {
    /// half-month slab billing: duration rounds up to 15-day blocks
    VelBankers,
}

/// resolved interest-policy parameters for one loan
///
/// Immutable once a loan is opened; owned by scheme master data upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRules {
    pub method: InterestMethod,
    pub annual_rate: Rate,
    pub compounding_frequency: Option<CompoundingFrequency>,
    pub customized_style: Option<CustomizedStyle>,
    /// a period shorter than this many days is still billed at this many days
    pub min_calc_days: u32,
    /// days of a partial slab forgiven under slab-billing methods
    pub grace_days: u32,
    pub penalty_rate: Option<Rate>,
    pub penalty_grace_days: u32,
    pub emi_tenure_months: Option<u32>,
    /// months of interest collected upfront at issuance
    pub advance_months: u32,
    pub processing_fee_percent: Decimal,
    /// scheme validity, drives the maturity date
    pub validity_months: u32,
}

impl SchemeRules {
    /// validate the rules for their method; every violation is a
    /// configuration error, surfaced before the loan opens
    pub fn validate(&self) -> Result<()> {
        if !self.annual_rate.as_decimal().is_sign_positive() || self.annual_rate.as_decimal().is_zero() {
            return Err(LedgerError::configuration(format!(
                "annual rate must be positive, got {}",
                self.annual_rate
            )));
        }
        if self.min_calc_days == 0 {
            return Err(LedgerError::configuration("min_calc_days must be at least 1"));
        }
        if self.validity_months == 0 {
            return Err(LedgerError::configuration("validity_months must be at least 1"));
        }

        match self.method {
            InterestMethod::Compound => {
                if self.compounding_frequency.is_none() {
                    return Err(LedgerError::configuration(
                        "compound method requires a compounding frequency",
                    ));
                }
            }
            InterestMethod::Emi => {
                match self.emi_tenure_months {
                    None | Some(0) => {
                        return Err(LedgerError::configuration(
                            "emi method requires a tenure of at least 1 month",
                        ));
                    }
                    Some(_) => {}
                }
            }
            InterestMethod::Customized => {
                if self.customized_style.is_none() {
                    return Err(LedgerError::configuration(
                        "customized method requires a customized style",
                    ));
                }
            }
            InterestMethod::Simple | InterestMethod::Multiple => {}
        }

        if self.penalty_rate.is_some_and(|r| r.as_decimal().is_sign_negative()) {
            return Err(LedgerError::configuration("penalty rate cannot be negative"));
        }

        Ok(())
    }

    /// interest collected upfront covering the scheme's advance months
    pub fn advance_interest(&self, principal: Money) -> Money {
        let months = Decimal::from(self.advance_months);
        (principal * self.annual_rate.as_decimal() * (months / Decimal::from(12))).rounded()
    }

    /// processing fee charged at issuance
    pub fn processing_fee(&self, principal: Money) -> Money {
        principal.percentage(self.processing_fee_percent).rounded()
    }

    /// all charges collected at issuance
    pub fn origination_charges(&self, principal: Money) -> OriginationCharges {
        OriginationCharges {
            advance_interest: self.advance_interest(principal),
            processing_fee: self.processing_fee(principal),
        }
    }
}
