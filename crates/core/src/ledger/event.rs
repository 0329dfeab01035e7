//! Caller-owned snapshot of one event's participants, expenses and payments.
//!
//! `EventLedger` is how a collaborator assembles a fact set: every write is
//! validated before it becomes a fact, and a rejected write leaves the
//! ledger untouched. Correcting an expense replaces its whole fact set.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use splitledger_shared::types::{EventId, ExpenseId, Money, ParticipantId, PaymentId};
use tracing::warn;

use super::error::LedgerError;
use super::facts::{ExpenseSplitFact, LedgerFacts, PaymentFact};
use super::service::{Settlement, SettlementEngine};
use super::types::ExpenseInput;
use super::validation::SplitValidator;

/// A recorded expense: the caller's input and the facts derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    /// The input as accepted.
    pub input: ExpenseInput,
    /// One fact per split line.
    pub facts: Vec<ExpenseSplitFact>,
}

/// A recorded payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    /// The payment fact.
    pub fact: PaymentFact,
    /// Date the payment was made; opaque to the engine.
    pub paid_on: Option<NaiveDate>,
}

/// All ledger data of one event.
#[derive(Debug, Clone)]
pub struct EventLedger {
    id: EventId,
    participants: BTreeMap<ParticipantId, String>,
    expenses: BTreeMap<ExpenseId, ExpenseRecord>,
    payments: BTreeMap<PaymentId, PaymentRecord>,
    validator: SplitValidator,
}

impl EventLedger {
    /// Creates an empty event ledger.
    #[must_use]
    pub fn new(id: EventId, validator: SplitValidator) -> Self {
        Self {
            id,
            participants: BTreeMap::new(),
            expenses: BTreeMap::new(),
            payments: BTreeMap::new(),
            validator,
        }
    }

    /// The event id.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Display name of a participant.
    #[must_use]
    pub fn display_name(&self, id: ParticipantId) -> Option<&str> {
        self.participants.get(&id).map(String::as_str)
    }

    /// Participants with their display names, in id order.
    pub fn participants(&self) -> impl Iterator<Item = (ParticipantId, &str)> {
        self.participants.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Returns a recorded expense.
    #[must_use]
    pub fn expense(&self, id: ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.get(&id)
    }

    /// Returns a recorded payment.
    #[must_use]
    pub fn payment(&self, id: PaymentId) -> Option<&PaymentRecord> {
        self.payments.get(&id)
    }

    /// Adds a participant.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateParticipant` if already present.
    pub fn add_participant(
        &mut self,
        id: ParticipantId,
        name: impl Into<String>,
    ) -> Result<(), LedgerError> {
        if self.participants.contains_key(&id) {
            return Err(LedgerError::DuplicateParticipant(id));
        }
        self.participants.insert(id, name.into());
        Ok(())
    }

    /// Removes a participant who has no expenses or payments.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ParticipantNotInEvent` for unknown ids and
    /// `LedgerError::ParticipantHasActivity` if the participant paid, owes,
    /// sent or received anything.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), LedgerError> {
        if !self.participants.contains_key(&id) {
            return Err(LedgerError::ParticipantNotInEvent(id));
        }
        if self.has_activity(id) {
            return Err(LedgerError::ParticipantHasActivity(id));
        }
        self.participants.remove(&id);
        Ok(())
    }

    /// Returns true if the participant appears in any expense or payment.
    #[must_use]
    pub fn has_activity(&self, id: ParticipantId) -> bool {
        let in_expenses = self.expenses.values().any(|record| {
            record.input.payer == id
                || record
                    .facts
                    .iter()
                    .any(|fact| fact.payer() == id || fact.debtor() == id)
        });
        let in_payments = self
            .payments
            .values()
            .any(|record| record.fact.from() == id || record.fact.to() == id);
        in_expenses || in_payments
    }

    /// Validates and records a new expense.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateExpense` if the id is taken, or the
    /// split validator's error.
    pub fn record_expense(
        &mut self,
        id: ExpenseId,
        input: ExpenseInput,
    ) -> Result<&ExpenseRecord, LedgerError> {
        if self.expenses.contains_key(&id) {
            return Err(LedgerError::DuplicateExpense(id));
        }
        let record = self.prepare_expense(id, input)?;
        Ok(self.expenses.entry(id).or_insert(record))
    }

    /// Replaces all facts of an existing expense.
    ///
    /// Runs the same validation as [`EventLedger::record_expense`]; on
    /// failure the previous facts stay in place.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ExpenseNotFound` if the id is unknown, or the
    /// split validator's error.
    pub fn replace_expense(
        &mut self,
        id: ExpenseId,
        input: ExpenseInput,
    ) -> Result<&ExpenseRecord, LedgerError> {
        if !self.expenses.contains_key(&id) {
            return Err(LedgerError::ExpenseNotFound(id));
        }
        let record = self.prepare_expense(id, input)?;
        let slot = self
            .expenses
            .get_mut(&id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        *slot = record;
        Ok(&*slot)
    }

    /// Removes an expense and all its facts.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ExpenseNotFound` if the id is unknown.
    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<ExpenseRecord, LedgerError> {
        self.expenses
            .remove(&id)
            .ok_or(LedgerError::ExpenseNotFound(id))
    }

    /// Validates and records a direct payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicatePayment`, the fact constructor's error,
    /// or `LedgerError::ParticipantNotInEvent`.
    pub fn record_payment(
        &mut self,
        id: PaymentId,
        from: ParticipantId,
        to: ParticipantId,
        amount: Money,
        paid_on: Option<NaiveDate>,
    ) -> Result<PaymentRecord, LedgerError> {
        if self.payments.contains_key(&id) {
            return Err(LedgerError::DuplicatePayment(id));
        }
        let record = self.prepare_payment(from, to, amount, paid_on)?;
        self.payments.insert(id, record);
        Ok(record)
    }

    /// Replaces an existing payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PaymentNotFound` if the id is unknown, or the
    /// same errors as [`EventLedger::record_payment`].
    pub fn update_payment(
        &mut self,
        id: PaymentId,
        from: ParticipantId,
        to: ParticipantId,
        amount: Money,
        paid_on: Option<NaiveDate>,
    ) -> Result<PaymentRecord, LedgerError> {
        if !self.payments.contains_key(&id) {
            return Err(LedgerError::PaymentNotFound(id));
        }
        let record = self.prepare_payment(from, to, amount, paid_on)?;
        self.payments.insert(id, record);
        Ok(record)
    }

    /// Removes a payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PaymentNotFound` if the id is unknown.
    pub fn remove_payment(&mut self, id: PaymentId) -> Result<PaymentRecord, LedgerError> {
        self.payments
            .remove(&id)
            .ok_or(LedgerError::PaymentNotFound(id))
    }

    /// Flattens the ledger into a fact snapshot.
    ///
    /// Facts are emitted in expense id order, then payment id order.
    #[must_use]
    pub fn facts(&self) -> LedgerFacts {
        LedgerFacts::new(self.participants.keys().copied())
            .with_splits(
                self.expenses
                    .values()
                    .flat_map(|record| record.facts.iter().copied()),
            )
            .with_payments(self.payments.values().map(|record| record.fact))
    }

    /// Computes balances and transfers for the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`SettlementEngine::compute`].
    pub fn settle(&self) -> Result<Settlement, LedgerError> {
        SettlementEngine::compute(&self.facts())
    }

    fn participant_set(&self) -> BTreeSet<ParticipantId> {
        self.participants.keys().copied().collect()
    }

    fn prepare_expense(
        &self,
        id: ExpenseId,
        input: ExpenseInput,
    ) -> Result<ExpenseRecord, LedgerError> {
        let lines = input.lines();
        let facts = self
            .validator
            .validate(&self.participant_set(), input.payer, input.total, &lines)
            .and_then(|()| {
                lines
                    .iter()
                    .map(|line| ExpenseSplitFact::new(input.payer, line.debtor, line.amount))
                    .collect::<Result<Vec<_>, _>>()
            })
            .inspect_err(|err| {
                warn!(event_id = %self.id, expense_id = %id, code = err.error_code(), "expense rejected: {err}");
            })?;

        Ok(ExpenseRecord { input, facts })
    }

    fn prepare_payment(
        &self,
        from: ParticipantId,
        to: ParticipantId,
        amount: Money,
        paid_on: Option<NaiveDate>,
    ) -> Result<PaymentRecord, LedgerError> {
        let fact = PaymentFact::new(from, to, amount)?;
        for id in [from, to] {
            if !self.participants.contains_key(&id) {
                warn!(event_id = %self.id, participant_id = %id, "payment rejected: unknown participant");
                return Err(LedgerError::ParticipantNotInEvent(id));
            }
        }
        Ok(PaymentRecord { fact, paid_on })
    }
}
