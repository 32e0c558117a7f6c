use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// scheme rules are incomplete or inconsistent for the chosen method;
    /// fatal, surfaced at loan opening, never defaulted silently
    #[error("invalid scheme configuration: {message}")]
    Configuration {
        message: String,
    },

    /// till date is on or before the loan's paid-through date; the operator
    /// must pick a later date
    #[error("interest already settled up to {paid_through}, requested {till_date}")]
    AlreadySettled {
        paid_through: NaiveDate,
        till_date: NaiveDate,
    },

    /// collection exceeds total outstanding; the operator must reduce the
    /// amount
    #[error("collection {collection} exceeds total outstanding {outstanding}")]
    Overpayment {
        collection: Money,
        outstanding: Money,
    },

    /// only the last ledger period may be reversed; anything earlier needs
    /// out-of-band correction
    #[error("cannot reverse a non-terminal ledger period (period {index} of {count})")]
    NonTerminalReversal {
        index: usize,
        count: usize,
    },

    #[error("loan is not open for receipts: current status is {status:?}")]
    LoanNotOpen {
        status: LoanStatus,
    },

    #[error("loan has not matured: maturity date is {maturity_date}")]
    LoanNotMatured {
        maturity_date: NaiveDate,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment modes total {modes_total} does not match collection {collection}")]
    PaymentModeMismatch {
        modes_total: Money,
        collection: Money,
    },

    #[error("no ledger period to reverse")]
    NothingToReverse,
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        LedgerError::Configuration { message: message.into() }
    }
}
