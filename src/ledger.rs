use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::interest::{AccrualEngine, EmiSchedule};
use crate::payments::{PaymentAllocator, ReceiptRequest};
use crate::scheme::{InterestMethod, SchemeRules};
use crate::types::{Adjustments, InterestQuote, PaymentModeEntry};

/// one settled period of the interest ledger
///
/// A period is written only by committing a receipt; every monetary field is
/// final at 2 decimal places. Periods are contiguous: each one starts where
/// the previous ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPeriod {
    pub index: usize,
    pub from_date: NaiveDate,
    pub till_date: NaiveDate,
    pub duration_days: i64,
    pub opening_principal: Money,
    /// unpaid interest carried in from the previous period
    pub carry_in_interest: Money,
    /// interest accrued over this period's window alone
    pub interest_accrued: Money,
    pub penalty_interest: Money,
    /// carry-in + accrued + penalty, the interest the receipt had to face
    pub total_accrued: Money,
    pub min_calc_days_applied: bool,
    pub adjustments: Adjustments,
    pub net_payable: Money,
    pub collection: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    /// extra principal pledged with this receipt
    pub added_principal: Money,
    /// principal written down with this receipt
    pub adjusted_principal: Money,
    /// unpaid interest carried out to the next period
    pub balance_interest: Money,
    pub closing_principal: Money,
    pub modes: Vec<PaymentModeEntry>,
    pub reference: Option<String>,
}

/// append-only interest ledger for one loan
///
/// Owns the scheme rules, the amortization schedule for EMI loans, and the
/// settled periods. Quoting is read-only; committing a receipt recomputes
/// the same quote and appends exactly one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEngine {
    rules: SchemeRules,
    emi_schedule: Option<EmiSchedule>,
    loan_date: NaiveDate,
    principal: Money,
    periods: Vec<InterestPeriod>,
}

impl LedgerEngine {
    /// open a ledger: validates the rules and, for EMI schemes, builds the
    /// amortization table from the original principal
    pub fn open(rules: SchemeRules, principal: Money, loan_date: NaiveDate) -> Result<Self> {
        rules.validate()?;
        if !principal.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount: principal });
        }

        let emi_schedule = build_schedule(&rules, principal, loan_date)?;

        Ok(Self {
            rules,
            emi_schedule,
            loan_date,
            principal,
            periods: Vec::new(),
        })
    }

    pub fn rules(&self) -> &SchemeRules {
        &self.rules
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn original_principal(&self) -> Money {
        self.principal
    }

    pub fn periods(&self) -> &[InterestPeriod] {
        &self.periods
    }

    pub fn emi_schedule(&self) -> Option<&EmiSchedule> {
        self.emi_schedule.as_ref()
    }

    /// date interest is settled up to; the loan date before any receipt
    pub fn paid_through(&self) -> NaiveDate {
        self.periods
            .last()
            .map(|p| p.till_date)
            .unwrap_or(self.loan_date)
    }

    pub fn outstanding_principal(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.closing_principal)
            .unwrap_or(self.principal)
    }

    /// unpaid interest carried out of the last settled period
    pub fn carry_in_interest(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.balance_interest)
            .unwrap_or(Money::ZERO)
    }

    /// both balances at zero: the loan is fully settled
    pub fn is_settled(&self) -> bool {
        self.outstanding_principal().is_zero() && self.carry_in_interest().is_zero()
    }

    /// swap the scheme rules; periods already settled are untouched and an
    /// EMI schedule is rebuilt from the original principal and loan date
    pub fn replace_rules(&mut self, rules: SchemeRules) -> Result<()> {
        rules.validate()?;
        self.emi_schedule = build_schedule(&rules, self.principal, self.loan_date)?;
        self.rules = rules;
        Ok(())
    }

    /// read-only interest quote up to a till date
    ///
    /// Quoting never mutates the ledger: the same till date against the same
    /// periods always returns the same quote. A till date at or before the
    /// paid-through date quotes zero days and zero new interest rather than
    /// failing; only a commit rejects such a date.
    pub fn quote(&self, till_date: NaiveDate) -> Result<InterestQuote> {
        let paid_through = self.paid_through();
        let opening_principal = self.outstanding_principal();
        let carry_in = self.carry_in_interest();

        let engine = AccrualEngine::new(&self.rules, self.emi_schedule.as_ref());
        let accrual = engine.accrue(opening_principal, paid_through, till_date)?;
        let penalty = engine.penalty_on_carry_in(carry_in, accrual.duration_days);

        Ok(InterestQuote {
            outstanding_principal: opening_principal,
            outstanding_interest: carry_in + accrual.interest + penalty,
            interest_accrued: accrual.interest,
            carry_in_interest: carry_in,
            penalty_interest: penalty,
            days_calculated: accrual.duration_days,
            min_calc_days_applied: accrual.min_days_applied,
        })
    }

    /// commit a receipt: quote, allocate, append one period
    ///
    /// Recomputes the quote from the current ledger state rather than
    /// trusting any figure the caller saw earlier, so a commit is
    /// deterministic in the ledger alone.
    pub fn commit(&mut self, request: &ReceiptRequest) -> Result<&InterestPeriod> {
        request.validate()?;

        let from_date = self.paid_through();
        if request.till_date <= from_date {
            return Err(LedgerError::AlreadySettled {
                paid_through: from_date,
                till_date: request.till_date,
            });
        }

        let quote = self.quote(request.till_date)?;
        let split = PaymentAllocator::allocate(
            quote.outstanding_interest,
            quote.outstanding_principal,
            &request.adjustments,
            request.collection,
        )?;

        if split.excess.is_positive() {
            return Err(LedgerError::Overpayment {
                collection: request.collection,
                outstanding: request.collection - split.excess,
            });
        }

        let closing_principal =
            split.balance_principal + request.added_principal - request.adjusted_principal;
        if closing_principal.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount {
                amount: request.adjusted_principal,
            });
        }

        let period = InterestPeriod {
            index: self.periods.len(),
            from_date,
            till_date: request.till_date,
            duration_days: quote.days_calculated,
            opening_principal: quote.outstanding_principal,
            carry_in_interest: quote.carry_in_interest,
            interest_accrued: quote.interest_accrued,
            penalty_interest: quote.penalty_interest,
            total_accrued: quote.outstanding_interest,
            min_calc_days_applied: quote.min_calc_days_applied,
            adjustments: request.adjustments,
            net_payable: split.net_payable,
            collection: request.collection,
            interest_paid: split.interest_paid,
            principal_paid: split.principal_paid,
            added_principal: request.added_principal,
            adjusted_principal: request.adjusted_principal,
            balance_interest: split.balance_interest,
            closing_principal,
            modes: request.modes.clone(),
            reference: request.reference.clone(),
        };

        debug!(
            index = period.index,
            till_date = %period.till_date,
            interest_paid = %period.interest_paid,
            principal_paid = %period.principal_paid,
            "committed receipt"
        );

        let index = period.index;
        self.periods.push(period);
        Ok(&self.periods[index])
    }

    /// reverse the period at an index; only the last period qualifies
    pub fn reverse(&mut self, index: usize) -> Result<InterestPeriod> {
        let count = self.periods.len();
        if count == 0 {
            return Err(LedgerError::NothingToReverse);
        }
        if index != count - 1 {
            return Err(LedgerError::NonTerminalReversal { index, count });
        }
        self.periods.pop().ok_or(LedgerError::NothingToReverse)
    }

    /// reverse the most recent period
    pub fn reverse_last(&mut self) -> Result<InterestPeriod> {
        let count = self.periods.len();
        if count == 0 {
            return Err(LedgerError::NothingToReverse);
        }
        self.reverse(count - 1)
    }
}

fn build_schedule(
    rules: &SchemeRules,
    principal: Money,
    loan_date: NaiveDate,
) -> Result<Option<EmiSchedule>> {
    if rules.method != InterestMethod::Emi {
        return Ok(None);
    }
    let tenure = rules.emi_tenure_months.ok_or_else(|| {
        LedgerError::configuration("emi method requires a tenure of at least 1 month")
    })?;
    Ok(Some(EmiSchedule::generate(
        principal,
        rules.annual_rate,
        tenure,
        loan_date,
    )))
}
