//! interest accrual: method dispatch, slab billing, EMI amortization

pub mod accrual;
pub mod emi;

pub use accrual::{Accrual, AccrualEngine};
pub use emi::{emi_amount, EmiSchedule, ScheduledInstallment};
