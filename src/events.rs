use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus};

/// all events that can be emitted by a loan account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanOpened {
        loan_id: LoanId,
        principal: Money,
        loan_date: NaiveDate,
        maturity_date: NaiveDate,
        advance_interest: Money,
        processing_fee: Money,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        final_collection: Money,
        timestamp: DateTime<Utc>,
    },
    LoanReopened {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanAuctioned {
        loan_id: LoanId,
        outstanding_principal: Money,
        outstanding_interest: Money,
        timestamp: DateTime<Utc>,
    },
    SchemeChanged {
        loan_id: LoanId,
        new_maturity_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },

    // ledger events
    ReceiptApplied {
        loan_id: LoanId,
        till_date: NaiveDate,
        collection: Money,
        applied_to_interest: Money,
        applied_to_principal: Money,
        balance_principal: Money,
        timestamp: DateTime<Utc>,
    },
    PeriodReversed {
        loan_id: LoanId,
        period_index: usize,
        collection_returned: Money,
        timestamp: DateTime<Utc>,
    },

    // status events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
