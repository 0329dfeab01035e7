//! Immutable ledger facts consumed by the balance aggregator.
//!
//! Facts can only be built through their constructors, which reject
//! non-positive amounts. Once built they are never mutated: correcting an
//! expense means replacing its whole fact set.

use std::collections::BTreeSet;

use serde::Serialize;
use splitledger_shared::types::{Money, ParticipantId};

use super::error::LedgerError;

/// "`debtor` owes `payer` `amount`", from one split line of one expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpenseSplitFact {
    payer: ParticipantId,
    debtor: ParticipantId,
    amount: Money,
}

impl ExpenseSplitFact {
    /// Creates a split fact.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount` is not positive.
    pub fn new(
        payer: ParticipantId,
        debtor: ParticipantId,
        amount: Money,
    ) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        Ok(Self {
            payer,
            debtor,
            amount,
        })
    }

    /// The participant who paid the expense.
    #[must_use]
    pub const fn payer(&self) -> ParticipantId {
        self.payer
    }

    /// The participant who owes their share.
    #[must_use]
    pub const fn debtor(&self) -> ParticipantId {
        self.debtor
    }

    /// The owed share.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Returns true if the payer covered their own share.
    #[must_use]
    pub fn is_self_split(&self) -> bool {
        self.payer == self.debtor
    }
}

/// A direct reimbursement already made outside expense splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentFact {
    from: ParticipantId,
    to: ParticipantId,
    amount: Money,
}

impl PaymentFact {
    /// Creates a payment fact.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` for non-positive amounts and
    /// `LedgerError::SelfPayment` when sender and receiver coincide.
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Money) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if from == to {
            return Err(LedgerError::SelfPayment(from));
        }
        Ok(Self { from, to, amount })
    }

    /// The participant who paid.
    #[must_use]
    pub const fn from(&self) -> ParticipantId {
        self.from
    }

    /// The participant who received the payment.
    #[must_use]
    pub const fn to(&self) -> ParticipantId {
        self.to
    }

    /// The amount paid.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }
}

/// The complete fact snapshot for one event, as read by a collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerFacts {
    /// Every participant of the event, including inactive ones.
    pub participants: BTreeSet<ParticipantId>,
    /// Split facts from every expense of the event.
    pub expense_splits: Vec<ExpenseSplitFact>,
    /// Every payment of the event.
    pub payments: Vec<PaymentFact>,
}

impl LedgerFacts {
    /// Creates an empty snapshot over the given participants.
    #[must_use]
    pub fn new(participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            participants: participants.into_iter().collect(),
            expense_splits: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Adds split facts to the snapshot.
    #[must_use]
    pub fn with_splits(mut self, splits: impl IntoIterator<Item = ExpenseSplitFact>) -> Self {
        self.expense_splits.extend(splits);
        self
    }

    /// Adds payment facts to the snapshot.
    #[must_use]
    pub fn with_payments(mut self, payments: impl IntoIterator<Item = PaymentFact>) -> Self {
        self.payments.extend(payments);
        self
    }

    /// Returns true if no expense or payment has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expense_splits.is_empty() && self.payments.is_empty()
    }
}
