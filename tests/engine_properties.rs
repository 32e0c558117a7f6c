use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pledge_ledger_rs::{
    Adjustments, InterestMethod, LedgerEngine, LedgerError, Money, PaymentAllocator, Rate,
    ReceiptRequest, SchemeRules,
};

fn day_zero() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn simple_rules(rate_percent: u32, min_calc_days: u32) -> SchemeRules {
    SchemeRules {
        method: InterestMethod::Simple,
        annual_rate: Rate::from_percentage(rate_percent),
        compounding_frequency: None,
        customized_style: None,
        min_calc_days,
        grace_days: 0,
        penalty_rate: None,
        penalty_grace_days: 0,
        emi_tenure_months: None,
        advance_months: 0,
        processing_fee_percent: dec!(0),
        validity_months: 12,
    }
}

fn open_ledger(principal: i64, rate_percent: u32, min_calc_days: u32) -> LedgerEngine {
    LedgerEngine::open(
        simple_rules(rate_percent, min_calc_days),
        Money::from_major(principal),
        day_zero(),
    )
    .unwrap()
}

/// a collection that is some whole-percent fraction of the outstanding total
fn fraction_of(total: Money, percent: u32) -> Money {
    (total * (Decimal::from(percent) / Decimal::from(100))).rounded()
}

proptest! {
    #[test]
    fn collection_is_conserved_across_the_split(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        days in 1i64..365i64,
        percent in 0u32..=100u32,
    ) {
        let ledger = open_ledger(principal, rate, 1);
        let till = day_zero() + Duration::days(days);
        let quote = ledger.quote(till).unwrap();

        let collection = fraction_of(quote.total_outstanding(), percent);
        let split = PaymentAllocator::allocate(
            quote.outstanding_interest,
            quote.outstanding_principal,
            &Adjustments::default(),
            collection,
        ).unwrap();

        prop_assert_eq!(split.interest_paid + split.principal_paid, collection);
    }

    #[test]
    fn principal_is_never_paid_before_interest_clears(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        days in 1i64..365i64,
        percent in 0u32..=100u32,
    ) {
        let ledger = open_ledger(principal, rate, 1);
        let till = day_zero() + Duration::days(days);
        let quote = ledger.quote(till).unwrap();

        let collection = fraction_of(quote.total_outstanding(), percent);
        let split = PaymentAllocator::allocate(
            quote.outstanding_interest,
            quote.outstanding_principal,
            &Adjustments::default(),
            collection,
        ).unwrap();

        if split.principal_paid.is_positive() {
            prop_assert_eq!(split.balance_interest, Money::ZERO);
        }
    }

    #[test]
    fn collecting_the_full_quote_settles_the_loan(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        days in 1i64..365i64,
    ) {
        let mut ledger = open_ledger(principal, rate, 1);
        let till = day_zero() + Duration::days(days);
        let quote = ledger.quote(till).unwrap();

        let period = ledger
            .commit(&ReceiptRequest::new(till, quote.total_outstanding()))
            .unwrap()
            .clone();

        prop_assert!(period.balance_interest.is_zero());
        prop_assert!(period.closing_principal.is_zero());
        prop_assert!(ledger.is_settled());
    }

    #[test]
    fn quoting_never_mutates_the_ledger(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        days in 1i64..365i64,
    ) {
        let ledger = open_ledger(principal, rate, 1);
        let till = day_zero() + Duration::days(days);

        let first = ledger.quote(till).unwrap();
        let second = ledger.quote(till).unwrap();

        prop_assert_eq!(first, second);
        prop_assert!(ledger.periods().is_empty());
    }

    #[test]
    fn ledger_stays_contiguous_and_monotonic(
        principal in 10_000i64..1_000_000i64,
        rate in 6u32..48u32,
        gaps in prop::collection::vec(1i64..90i64, 1..8),
    ) {
        let mut ledger = open_ledger(principal, rate, 1);
        let mut till = day_zero();

        for gap in gaps {
            till += Duration::days(gap);
            let quote = ledger.quote(till).unwrap();
            // pay the interest only, principal stays put
            ledger
                .commit(&ReceiptRequest::new(till, quote.outstanding_interest))
                .unwrap();
        }

        let periods = ledger.periods();
        prop_assert_eq!(periods[0].from_date, day_zero());
        for pair in periods.windows(2) {
            prop_assert_eq!(pair[1].from_date, pair[0].till_date);
            prop_assert!(pair[1].till_date > pair[1].from_date);
        }
        for period in periods {
            prop_assert_eq!(
                period.closing_principal + period.principal_paid + period.adjusted_principal,
                period.opening_principal + period.added_principal
            );
        }
        prop_assert_eq!(ledger.outstanding_principal(), Money::from_major(principal));
    }

    #[test]
    fn reversal_restores_the_previous_state(
        principal in 10_000i64..1_000_000i64,
        rate in 6u32..48u32,
        first_days in 1i64..180i64,
        second_days in 1i64..180i64,
        percent in 1u32..=100u32,
    ) {
        let mut ledger = open_ledger(principal, rate, 1);
        let first_till = day_zero() + Duration::days(first_days);
        let quote = ledger.quote(first_till).unwrap();
        ledger
            .commit(&ReceiptRequest::new(first_till, fraction_of(quote.total_outstanding(), percent)))
            .unwrap();

        let paid_through = ledger.paid_through();
        let outstanding = ledger.outstanding_principal();
        let carry_in = ledger.carry_in_interest();

        let second_till = first_till + Duration::days(second_days);
        let quote = ledger.quote(second_till).unwrap();
        ledger
            .commit(&ReceiptRequest::new(second_till, quote.outstanding_interest))
            .unwrap();
        ledger.reverse_last().unwrap();

        prop_assert_eq!(ledger.paid_through(), paid_through);
        prop_assert_eq!(ledger.outstanding_principal(), outstanding);
        prop_assert_eq!(ledger.carry_in_interest(), carry_in);
    }

    #[test]
    fn short_periods_bill_at_the_minimum_days(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        min_days in 2u32..30u32,
        days in 1i64..30i64,
    ) {
        prop_assume!(days < i64::from(min_days));

        let ledger = open_ledger(principal, rate, min_days);
        let short = ledger.quote(day_zero() + Duration::days(days)).unwrap();
        let at_minimum = ledger
            .quote(day_zero() + Duration::days(i64::from(min_days)))
            .unwrap();

        prop_assert!(short.min_calc_days_applied);
        prop_assert!(!at_minimum.min_calc_days_applied);
        prop_assert_eq!(short.interest_accrued, at_minimum.interest_accrued);
    }

    #[test]
    fn overpayment_is_always_rejected(
        principal in 1_000i64..1_000_000i64,
        rate in 6u32..48u32,
        days in 1i64..365i64,
        excess in 1i64..10_000i64,
    ) {
        let mut ledger = open_ledger(principal, rate, 1);
        let till = day_zero() + Duration::days(days);
        let quote = ledger.quote(till).unwrap();

        let result = ledger.commit(&ReceiptRequest::new(
            till,
            quote.total_outstanding() + Money::from_decimal(Decimal::from(excess) / dec!(100)),
        ));

        prop_assert!(
            matches!(result, Err(LedgerError::Overpayment { .. })),
            "expected overpayment rejection, got {:?}",
            result
        );
        prop_assert!(ledger.periods().is_empty());
    }
}

#[test]
fn interest_only_servicing_then_redemption() {
    let mut ledger = open_ledger(50_000, 24, 15);

    // service the interest monthly for three months
    let mut till = day_zero();
    for _ in 0..3 {
        till += Duration::days(30);
        let quote = ledger.quote(till).unwrap();
        let period = ledger
            .commit(&ReceiptRequest::new(till, quote.outstanding_interest))
            .unwrap();
        assert_eq!(period.balance_interest, Money::ZERO);
        assert_eq!(period.closing_principal, Money::from_major(50_000));
    }

    // redeem the pledge in full
    till += Duration::days(30);
    let quote = ledger.quote(till).unwrap();
    ledger
        .commit(&ReceiptRequest::new(till, quote.total_outstanding()))
        .unwrap();
    assert!(ledger.is_settled());
}

#[test]
fn neglected_loan_accumulates_carried_interest() {
    let mut ledger = open_ledger(50_000, 24, 15);

    // nothing collected against the first billing
    let till = day_zero() + Duration::days(30);
    ledger
        .commit(&ReceiptRequest::new(till, Money::ZERO))
        .unwrap();

    let quote = ledger.quote(till + Duration::days(30)).unwrap();
    assert_eq!(
        quote.outstanding_interest,
        quote.carry_in_interest + quote.interest_accrued
    );
    assert_eq!(
        quote.carry_in_interest,
        Money::from_str_exact("986.30").unwrap()
    );
}
