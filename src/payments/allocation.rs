use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{Adjustments, PaymentSplit};

/// interest-first allocation of a collection amount
///
/// Pledge receipts always clear the billed interest before any principal:
/// the collection covers the net payable first and only the remainder
/// reduces the pledge amount. There is no configurable waterfall here, the
/// ordering is a product rule.
pub struct PaymentAllocator;

impl PaymentAllocator {
    /// split a collection between interest and principal
    ///
    /// `interest_due` is the period's billed interest (accrued + carry-in +
    /// penalty); adjustments shift the billed figure before allocation.
    /// Whatever the two balances cannot absorb is reported as `excess`; the
    /// allocator clamps and the caller decides whether that is an
    /// overpayment to reject.
    pub fn allocate(
        interest_due: Money,
        outstanding_principal: Money,
        adjustments: &Adjustments,
        collection: Money,
    ) -> Result<PaymentSplit> {
        if collection.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount { amount: collection });
        }

        let billed = interest_due + adjustments.net();
        let net_payable = billed.max(Money::ZERO).rounded();
        // credits beyond the interest due spill over to the principal side
        let credit_surplus = (Money::ZERO - billed).max(Money::ZERO).rounded();

        let interest_paid = collection.min(net_payable);
        let remainder = collection - interest_paid + credit_surplus;
        let principal_paid = remainder.min(outstanding_principal).rounded();
        let excess = (remainder - principal_paid).max(Money::ZERO);

        Ok(PaymentSplit {
            interest_paid,
            principal_paid,
            balance_interest: net_payable - interest_paid,
            balance_principal: outstanding_principal - principal_paid,
            net_payable,
            excess,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_interest_cleared_before_principal() {
        // 50,000 principal at 24% for 30 days owes 986.30 interest; a 1,000
        // collection clears the interest and chips 13.70 off the principal
        let split = PaymentAllocator::allocate(
            money("986.30"),
            Money::from_major(50_000),
            &Adjustments::default(),
            Money::from_major(1_000),
        )
        .unwrap();

        assert_eq!(split.interest_paid, money("986.30"));
        assert_eq!(split.principal_paid, money("13.70"));
        assert_eq!(split.balance_interest, Money::ZERO);
        assert_eq!(split.balance_principal, money("49986.30"));
        assert_eq!(split.excess, Money::ZERO);
        assert!(!split.is_full_settlement());
    }

    #[test]
    fn test_partial_interest_leaves_principal_untouched() {
        let split = PaymentAllocator::allocate(
            money("986.30"),
            Money::from_major(50_000),
            &Adjustments::default(),
            Money::from_major(500),
        )
        .unwrap();

        assert_eq!(split.interest_paid, Money::from_major(500));
        assert_eq!(split.principal_paid, Money::ZERO);
        assert_eq!(split.balance_interest, money("486.30"));
        assert_eq!(split.balance_principal, Money::from_major(50_000));
    }

    #[test]
    fn test_adjustments_shift_the_net_payable() {
        let adjustments = Adjustments {
            other_credits: Money::from_major(100),
            other_debits: Money::from_major(50),
            default_amount: Money::from_major(20),
            add_less: money("-6.30"),
        };
        // 986.30 - 100 + 50 + 20 - 6.30 = 950.00
        let split = PaymentAllocator::allocate(
            money("986.30"),
            Money::from_major(50_000),
            &adjustments,
            Money::from_major(950),
        )
        .unwrap();

        assert_eq!(split.net_payable, Money::from_major(950));
        assert_eq!(split.interest_paid, Money::from_major(950));
        assert_eq!(split.principal_paid, Money::ZERO);
        assert_eq!(split.balance_interest, Money::ZERO);
    }

    #[test]
    fn test_credit_surplus_reduces_principal() {
        // credits exceed the interest due; the surplus comes off principal
        let adjustments = Adjustments {
            other_credits: Money::from_major(300),
            ..Adjustments::default()
        };
        let split = PaymentAllocator::allocate(
            Money::from_major(200),
            Money::from_major(10_000),
            &adjustments,
            Money::ZERO,
        )
        .unwrap();

        assert_eq!(split.net_payable, Money::ZERO);
        assert_eq!(split.interest_paid, Money::ZERO);
        assert_eq!(split.principal_paid, Money::from_major(100));
        assert_eq!(split.balance_principal, Money::from_major(9_900));
    }

    #[test]
    fn test_exact_settlement_closes_both_balances() {
        let split = PaymentAllocator::allocate(
            money("986.30"),
            Money::from_major(50_000),
            &Adjustments::default(),
            money("50986.30"),
        )
        .unwrap();

        assert_eq!(split.interest_paid, money("986.30"));
        assert_eq!(split.principal_paid, Money::from_major(50_000));
        assert!(split.is_full_settlement());
        assert_eq!(split.excess, Money::ZERO);
    }

    #[test]
    fn test_overpayment_is_clamped_and_reported() {
        let split = PaymentAllocator::allocate(
            money("986.30"),
            Money::from_major(50_000),
            &Adjustments::default(),
            money("51000.00"),
        )
        .unwrap();

        assert_eq!(split.interest_paid, money("986.30"));
        assert_eq!(split.principal_paid, Money::from_major(50_000));
        assert_eq!(split.excess, money("13.70"));
    }

    #[test]
    fn test_conservation() {
        // every paisa of the collection lands in exactly one bucket
        for collection in [dec!(0.01), dec!(500), dec!(986.30), dec!(12345.67)] {
            let collection = Money::from_decimal(collection);
            let split = PaymentAllocator::allocate(
                money("986.30"),
                Money::from_major(50_000),
                &Adjustments::default(),
                collection,
            )
            .unwrap();
            assert_eq!(split.interest_paid + split.principal_paid + split.excess, collection);
        }
    }
}
