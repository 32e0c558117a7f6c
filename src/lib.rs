//! pledge loan interest accrual and repayment ledgers
//!
//! The crate is a pure computation core: quoting interest is read-only and
//! safe to call concurrently; committing a receipt is the only mutation and
//! must be serialized per loan by the caller (wrap it in a transaction with
//! row locking). Persistence and transport live outside this crate.

pub mod account;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod maturity;
pub mod payments;
pub mod scheme;
pub mod types;

// re-export key types
pub use account::LoanAccount;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use interest::{Accrual, AccrualEngine, EmiSchedule, ScheduledInstallment};
pub use ledger::{InterestPeriod, LedgerEngine};
pub use maturity::maturity_date;
pub use payments::{PaymentAllocator, ReceiptRequest};
pub use scheme::{CompoundingFrequency, CustomizedStyle, InterestMethod, SchemeRules};
pub use types::{
    Adjustments, InterestQuote, LoanId, LoanStatus, OriginationCharges, PaymentMode,
    PaymentModeEntry, PaymentSplit,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
