use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::interest::emi::EmiSchedule;
use crate::scheme::{CustomizedStyle, InterestMethod, SchemeRules};
use crate::types::year_fraction;

/// result of accruing interest over one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accrual {
    pub duration_days: i64,
    pub interest: Money,
    /// the minimum-calculation-days floor produced the billed figure
    pub min_days_applied: bool,
}

impl Accrual {
    fn zero() -> Self {
        Self {
            duration_days: 0,
            interest: Money::ZERO,
            min_days_applied: false,
        }
    }
}

/// method-dispatched interest accrual for one loan
///
/// Borrows the loan's resolved scheme rules and, for EMI schemes, the
/// amortization table precomputed at opening. Pure: the same inputs always
/// produce the same accrual.
pub struct AccrualEngine<'a> {
    rules: &'a SchemeRules,
    emi_schedule: Option<&'a EmiSchedule>,
}

impl<'a> AccrualEngine<'a> {
    pub fn new(rules: &'a SchemeRules, emi_schedule: Option<&'a EmiSchedule>) -> Self {
        Self { rules, emi_schedule }
    }

    /// accrue interest on the opening principal from one date to another
    ///
    /// A non-positive duration returns a zero accrual — the caller reads it
    /// as "already paid up to this date", not as an error. Durations under
    /// the scheme's minimum calculation days are floored: interest is
    /// recomputed at the minimum and the larger figure billed.
    pub fn accrue(
        &self,
        opening_principal: Money,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Accrual> {
        let days = (to_date - from_date).num_days();
        if days <= 0 {
            return Ok(Accrual::zero());
        }

        let natural = self.interest_for(opening_principal, from_date, days)?;

        let min_days = i64::from(self.rules.min_calc_days);
        let (interest, min_days_applied) = if days < min_days {
            let floored = self.interest_for(opening_principal, from_date, min_days)?;
            if floored > natural {
                (floored, true)
            } else {
                (natural, false)
            }
        } else {
            (natural, false)
        };

        Ok(Accrual {
            duration_days: days,
            interest: interest.rounded(),
            min_days_applied,
        })
    }

    /// penalty on unpaid interest carried in from the previous period
    ///
    /// Charged at the scheme's penalty rate for the days beyond the penalty
    /// grace window; zero when no penalty rate is configured.
    pub fn penalty_on_carry_in(&self, carry_in: Money, days: i64) -> Money {
        let Some(penalty_rate) = self.rules.penalty_rate else {
            return Money::ZERO;
        };
        if !carry_in.is_positive() {
            return Money::ZERO;
        }

        let grace = i64::from(self.rules.penalty_grace_days);
        if days <= grace {
            return Money::ZERO;
        }

        let charged_days = days - grace;
        (carry_in * penalty_rate.as_decimal() * year_fraction(charged_days)).rounded()
    }

    fn interest_for(&self, principal: Money, from_date: NaiveDate, days: i64) -> Result<Money> {
        let rate = self.rules.annual_rate;

        match self.rules.method {
            InterestMethod::Simple => {
                Ok(principal * rate.as_decimal() * year_fraction(days))
            }
            InterestMethod::Compound => {
                let frequency = self.rules.compounding_frequency.ok_or_else(|| {
                    LedgerError::configuration("compound scheme is missing its frequency")
                })?;
                Ok(compound_interest(
                    principal,
                    rate.as_decimal(),
                    frequency.periods_per_year(),
                    days,
                ))
            }
            InterestMethod::Emi => {
                let schedule = self.emi_schedule.ok_or_else(|| {
                    LedgerError::configuration("emi scheme has no amortization schedule")
                })?;
                Ok(schedule.interest_between(from_date, from_date + Duration::days(days)))
            }
            InterestMethod::Multiple => {
                let billed_days = month_slab_days(days, i64::from(self.rules.grace_days));
                Ok(principal * rate.as_decimal() * year_fraction(billed_days))
            }
            InterestMethod::Customized => {
                let style = self.rules.customized_style.ok_or_else(|| {
                    LedgerError::configuration("customized scheme is missing its style")
                })?;
                match style {
                    CustomizedStyle::VelBankers => {
                        let billed_days = half_month_slab_days(days);
                        Ok(principal * rate.as_decimal() * year_fraction(billed_days))
                    }
                }
            }
        }
    }
}

/// discrete compounding with a linearly-prorated partial period
///
/// `P * ((1+r)^whole * (1 + r*frac) - 1)` where the exponent is the exact
/// number of compounding periods in the duration.
fn compound_interest(principal: Money, annual_rate: Decimal, periods_per_year: u32, days: i64) -> Money {
    let n = Decimal::from(periods_per_year);
    let periodic_rate = annual_rate / n;
    let exact_periods = year_fraction(days) * n;
    let whole_periods = exact_periods.floor();
    let fraction = exact_periods - whole_periods;

    let mut factor = Decimal::ONE;
    let base = Decimal::ONE + periodic_rate;
    let whole: u32 = whole_periods.to_string().parse().unwrap_or(0);
    for _ in 0..whole {
        factor *= base;
    }
    factor *= Decimal::ONE + periodic_rate * fraction;

    Money::from_decimal(principal.as_decimal() * (factor - Decimal::ONE))
}

/// round duration up to whole 30-day blocks; a trailing partial block of at
/// most `grace_days` days is forgiven
fn month_slab_days(days: i64, grace_days: i64) -> i64 {
    let blocks = days / 30;
    let remainder = days % 30;
    if remainder > 0 && remainder > grace_days {
        (blocks + 1) * 30
    } else {
        blocks * 30
    }
}

/// round duration up to 15-day half-month blocks
fn half_month_slab_days(days: i64) -> i64 {
    (days / 15 + i64::from(days % 15 > 0)) * 15
}
