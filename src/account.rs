use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::info;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::{InterestPeriod, LedgerEngine};
use crate::maturity::maturity_date;
use crate::payments::ReceiptRequest;
use crate::scheme::SchemeRules;
use crate::types::{InterestQuote, LoanId, LoanStatus, OriginationCharges};

/// one pledge loan: ledger, lifecycle status, maturity
///
/// The account is the mutation boundary. Callers needing concurrent access
/// wrap it in their own synchronization; the account itself assumes one
/// writer at a time.
#[derive(Debug)]
pub struct LoanAccount {
    id: LoanId,
    ledger: LedgerEngine,
    maturity_date: NaiveDate,
    status: LoanStatus,
    origination_charges: OriginationCharges,
    events: EventStore,
}

impl LoanAccount {
    /// open a loan: validate the scheme, compute maturity and upfront charges
    pub fn open(
        rules: SchemeRules,
        principal: Money,
        loan_date: NaiveDate,
        time: &SafeTimeProvider,
    ) -> Result<Self> {
        let origination_charges = rules.origination_charges(principal);
        let maturity = maturity_date(loan_date, rules.validity_months);
        let ledger = LedgerEngine::open(rules, principal, loan_date)?;

        let id = Uuid::new_v4();
        let mut events = EventStore::new();
        events.emit(Event::LoanOpened {
            loan_id: id,
            principal,
            loan_date,
            maturity_date: maturity,
            advance_interest: origination_charges.advance_interest,
            processing_fee: origination_charges.processing_fee,
            timestamp: time.now(),
        });

        info!(loan_id = %id, %principal, %loan_date, "loan opened");

        Ok(Self {
            id,
            ledger,
            maturity_date: maturity,
            status: LoanStatus::Open,
            origination_charges,
            events,
        })
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn ledger(&self) -> &LedgerEngine {
        &self.ledger
    }

    pub fn maturity_date(&self) -> NaiveDate {
        self.maturity_date
    }

    pub fn origination_charges(&self) -> OriginationCharges {
        self.origination_charges
    }

    /// stored status; never reports Matured
    pub fn status(&self) -> LoanStatus {
        self.status
    }

    /// status as the operator sees it: an open loan past its maturity date
    /// reads as Matured without any stored transition
    pub fn status_as_of(&self, today: NaiveDate) -> LoanStatus {
        match self.status {
            LoanStatus::Open if today > self.maturity_date => LoanStatus::Matured,
            other => other,
        }
    }

    /// read-only interest quote up to a till date
    ///
    /// Works for open and matured loans alike; a closed or auctioned loan
    /// has nothing left to quote.
    pub fn quote_as_of(&self, till_date: NaiveDate) -> Result<InterestQuote> {
        self.require_open()?;
        self.ledger.quote(till_date)
    }

    /// apply a receipt; full settlement closes the loan
    pub fn apply_receipt(
        &mut self,
        request: &ReceiptRequest,
        time: &SafeTimeProvider,
    ) -> Result<InterestPeriod> {
        self.require_open()?;

        let period = self.ledger.commit(request)?.clone();

        self.events.emit(Event::ReceiptApplied {
            loan_id: self.id,
            till_date: period.till_date,
            collection: period.collection,
            applied_to_interest: period.interest_paid,
            applied_to_principal: period.principal_paid,
            balance_principal: period.closing_principal,
            timestamp: time.now(),
        });

        if self.ledger.is_settled() {
            self.transition(LoanStatus::Closed, time);
            self.events.emit(Event::LoanClosed {
                loan_id: self.id,
                final_collection: period.collection,
                timestamp: time.now(),
            });
        }

        Ok(period)
    }

    /// reverse the most recent receipt; undoing the closing receipt reopens
    /// the loan
    pub fn cancel_last_receipt(&mut self, time: &SafeTimeProvider) -> Result<InterestPeriod> {
        if self.status == LoanStatus::Auctioned {
            return Err(LedgerError::LoanNotOpen {
                status: self.status,
            });
        }

        let period = self.ledger.reverse_last()?;

        self.events.emit(Event::PeriodReversed {
            loan_id: self.id,
            period_index: period.index,
            collection_returned: period.collection,
            timestamp: time.now(),
        });

        if self.status == LoanStatus::Closed {
            self.transition(LoanStatus::Open, time);
            self.events.emit(Event::LoanReopened {
                loan_id: self.id,
                timestamp: time.now(),
            });
        }

        Ok(period)
    }

    /// swap the loan onto a different scheme
    ///
    /// Settled periods keep their figures; accrual from the paid-through
    /// date onward follows the new rules, and the maturity date is
    /// recomputed from the loan date and the new validity.
    pub fn change_scheme(&mut self, rules: SchemeRules, time: &SafeTimeProvider) -> Result<()> {
        self.require_open()?;

        let validity = rules.validity_months;
        self.ledger.replace_rules(rules)?;
        self.maturity_date = maturity_date(self.ledger.loan_date(), validity);

        self.events.emit(Event::SchemeChanged {
            loan_id: self.id,
            new_maturity_date: self.maturity_date,
            timestamp: time.now(),
        });

        Ok(())
    }

    /// send the pledged items to auction; only a matured loan qualifies
    pub fn mark_auctioned(&mut self, time: &SafeTimeProvider) -> Result<()> {
        let today = time.now().date_naive();
        match self.status_as_of(today) {
            LoanStatus::Matured => {}
            LoanStatus::Open => {
                return Err(LedgerError::LoanNotMatured {
                    maturity_date: self.maturity_date,
                });
            }
            status => return Err(LedgerError::LoanNotOpen { status }),
        }

        let outstanding_interest = self.ledger.quote(today)?.outstanding_interest;

        self.transition(LoanStatus::Auctioned, time);
        self.events.emit(Event::LoanAuctioned {
            loan_id: self.id,
            outstanding_principal: self.ledger.outstanding_principal(),
            outstanding_interest,
            timestamp: time.now(),
        });

        Ok(())
    }

    /// drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn require_open(&self) -> Result<()> {
        match self.status {
            LoanStatus::Open => Ok(()),
            status => Err(LedgerError::LoanNotOpen { status }),
        }
    }

    fn transition(&mut self, new_status: LoanStatus, time: &SafeTimeProvider) {
        let old_status = self.status;
        self.status = new_status;
        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status,
            timestamp: time.now(),
        });
        info!(loan_id = %self.id, ?old_status, ?new_status, "status changed");
    }
}
