use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::maturity::add_months;

/// one row of an EMI amortization table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub beginning_balance: Money,
    pub emi_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
}

/// precomputed amortization table for an EMI-method loan
///
/// Built once at loan opening from the original principal and tenure; quotes
/// read interest off this table rather than recomputing the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    pub emi_amount: Money,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
}

impl EmiSchedule {
    /// generate the table: standard amortization, equal installments
    pub fn generate(
        principal: Money,
        annual_rate: Rate,
        tenure_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        let monthly_rate = annual_rate.monthly_rate().as_decimal();
        let emi = emi_amount(principal, annual_rate, tenure_months);

        let mut installments = Vec::with_capacity(tenure_months as usize);
        let mut balance = principal;
        let mut total_interest = Money::ZERO;

        for i in 1..=tenure_months {
            let due_date = add_months(start_date, i);
            let interest_portion = balance * monthly_rate;
            let principal_portion = emi - interest_portion;
            let ending_balance = (balance - principal_portion).max(Money::ZERO);

            total_interest += interest_portion;

            installments.push(ScheduledInstallment {
                installment_number: i,
                due_date,
                beginning_balance: balance,
                emi_amount: emi,
                interest_portion,
                principal_portion,
                ending_balance,
            });

            balance = ending_balance;
        }

        // fold residual rounding into the final installment
        if let Some(last) = installments.last_mut() {
            if last.ending_balance.is_positive() && last.ending_balance < Money::ONE {
                last.principal_portion += last.ending_balance;
                last.emi_amount += last.ending_balance;
                last.ending_balance = Money::ZERO;
            }
        }

        Self {
            principal,
            annual_rate,
            tenure_months,
            start_date,
            emi_amount: emi,
            installments,
            total_interest,
        }
    }

    /// interest attributable to a date window, read off the table
    ///
    /// Whole installments inside the window contribute their full interest
    /// portion; a partial month is prorated linearly over its calendar days.
    /// Past the final installment the schedule is fully amortized and no
    /// further interest accrues.
    pub fn interest_between(&self, from: NaiveDate, to: NaiveDate) -> Money {
        if to <= from {
            return Money::ZERO;
        }
        (self.cumulative_interest_until(to) - self.cumulative_interest_until(from))
            .max(Money::ZERO)
    }

    fn cumulative_interest_until(&self, date: NaiveDate) -> Money {
        let mut total = Money::ZERO;
        let mut period_start = self.start_date;

        for installment in &self.installments {
            let due = installment.due_date;
            if date >= due {
                total += installment.interest_portion;
            } else if date > period_start {
                let elapsed = (date - period_start).num_days();
                let span = (due - period_start).num_days().max(1);
                let fraction = Decimal::from(elapsed) / Decimal::from(span);
                total += installment.interest_portion * fraction;
                break;
            } else {
                break;
            }
            period_start = due;
        }

        total
    }
}

/// standard EMI amount: P * r * (1+r)^n / ((1+r)^n - 1)
pub fn emi_amount(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();
    if monthly_rate.is_zero() {
        return principal / Decimal::from(months);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + monthly_rate;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_emi_amount() {
        let emi = emi_amount(Money::from_major(100_000), Rate::from_percentage(12), 12);
        assert_eq!(emi.rounded().to_string(), "8884.88");
    }

    #[test]
    fn test_schedule_shape() {
        let schedule = EmiSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
            d(2024, 1, 1),
        );

        assert_eq!(schedule.installments.len(), 12);

        let first = &schedule.installments[0];
        assert_eq!(first.due_date, d(2024, 2, 1));
        assert_eq!(first.beginning_balance, Money::from_major(100_000));
        assert_eq!(first.interest_portion.rounded(), Money::from_major(1_000));

        // interest declines as the balance amortizes
        for pair in schedule.installments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }

        let last = schedule.installments.last().unwrap();
        assert_eq!(last.ending_balance, Money::ZERO);
    }

    #[test]
    fn test_interest_between_whole_months() {
        let schedule = EmiSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
            d(2024, 1, 1),
        );

        let first_month = schedule.interest_between(d(2024, 1, 1), d(2024, 2, 1));
        assert_eq!(first_month.rounded(), Money::from_major(1_000));

        let two_months = schedule.interest_between(d(2024, 1, 1), d(2024, 3, 1));
        assert!(two_months > first_month);
        assert!(two_months < first_month * rust_decimal::Decimal::TWO);
    }

    #[test]
    fn test_interest_between_partial_month() {
        let schedule = EmiSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
            d(2024, 1, 1),
        );

        // half of january's 31-day month
        let partial = schedule.interest_between(d(2024, 1, 1), d(2024, 1, 16));
        let full = schedule.interest_between(d(2024, 1, 1), d(2024, 2, 1));
        assert!(partial > Money::ZERO);
        assert!(partial < full);
    }

    #[test]
    fn test_no_interest_past_final_installment() {
        let schedule = EmiSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
            d(2024, 1, 1),
        );

        let beyond = schedule.interest_between(d(2025, 1, 1), d(2025, 6, 1));
        assert_eq!(beyond, Money::ZERO);
    }

    #[test]
    fn test_zero_window() {
        let schedule = EmiSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percentage(12),
            12,
            d(2024, 1, 1),
        );

        assert_eq!(schedule.interest_between(d(2024, 3, 1), d(2024, 3, 1)), Money::ZERO);
    }
}
