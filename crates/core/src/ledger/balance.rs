//! Net balance aggregation.
//!
//! Folds every split and payment fact of an event into one signed balance
//! per participant. Positive means the participant is owed money, negative
//! means they owe.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use splitledger_shared::types::{Money, ParticipantId};

use super::error::LedgerError;
use super::facts::{ExpenseSplitFact, LedgerFacts, PaymentFact};
use super::settlement::SettlementTransfer;

/// One signed balance per participant, enumerated in increasing id order.
///
/// Participants without any facts are present with a zero balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NetBalance(BTreeMap<ParticipantId, Money>);

impl NetBalance {
    /// Creates a zero balance for every participant.
    #[must_use]
    pub fn zeroed<'a>(participants: impl IntoIterator<Item = &'a ParticipantId>) -> Self {
        Self(participants.into_iter().map(|id| (*id, Money::ZERO)).collect())
    }

    /// Returns the balance of a participant, if known.
    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<Money> {
        self.0.get(&id).copied()
    }

    /// Iterates balances in increasing participant id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, Money)> + '_ {
        self.0.iter().map(|(id, amount)| (*id, *amount))
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every balance, or `None` if it leaves the `Money` range.
    /// Zero for any valid fact set.
    #[must_use]
    pub fn total(&self) -> Option<Money> {
        Money::checked_sum(self.0.values().copied())
    }

    /// Number of participants with a nonzero balance.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.0.values().filter(|b| !b.is_zero()).count()
    }

    /// Returns true if every balance is exactly zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|b| b.is_zero())
    }

    /// Applies a settlement transfer: the sender's position improves, the
    /// receiver's is reduced.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ParticipantNotInEvent` for unknown ids and
    /// `LedgerError::AmountOverflow` if either balance leaves the range.
    pub fn apply(&mut self, transfer: &SettlementTransfer) -> Result<(), LedgerError> {
        self.shift(transfer.from, transfer.to, transfer.amount)
    }

    /// Consumes the balance, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<ParticipantId, Money> {
        self.0
    }

    fn entry(&mut self, id: ParticipantId) -> Result<&mut Money, LedgerError> {
        self.0
            .get_mut(&id)
            .ok_or(LedgerError::ParticipantNotInEvent(id))
    }

    /// Credits `creditor` and debits `debtor` by `amount`.
    fn shift(
        &mut self,
        creditor: ParticipantId,
        debtor: ParticipantId,
        amount: Money,
    ) -> Result<(), LedgerError> {
        let credit = *self.entry(creditor)?;
        let debit = *self.entry(debtor)?;
        if creditor == debtor {
            return Ok(());
        }

        // Compute both before touching either so a failure leaves no trace.
        let credited = credit
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        let debited = debit
            .checked_sub(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        *self.entry(creditor)? = credited;
        *self.entry(debtor)? = debited;
        Ok(())
    }
}

impl FromIterator<(ParticipantId, Money)> for NetBalance {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Money)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Balance aggregator over an event's facts.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Folds split and payment facts into net balances.
    ///
    /// Each split credits its payer and debits its debtor by the split
    /// amount, so a self-split nets to zero. Each payment credits its sender
    /// and debits its receiver. Fold order never affects the result.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ParticipantNotInEvent` if a fact references an
    /// id outside `participants` and `LedgerError::AmountOverflow` if a
    /// balance leaves the `Money` range. No partial balance is returned.
    pub fn aggregate(
        participants: &BTreeSet<ParticipantId>,
        expense_splits: &[ExpenseSplitFact],
        payments: &[PaymentFact],
    ) -> Result<NetBalance, LedgerError> {
        let mut balances = NetBalance::zeroed(participants);

        for split in expense_splits {
            balances.shift(split.payer(), split.debtor(), split.amount())?;
        }

        for payment in payments {
            balances.shift(payment.from(), payment.to(), payment.amount())?;
        }

        Ok(balances)
    }

    /// Aggregates a whole fact snapshot.
    ///
    /// # Errors
    ///
    /// See [`BalanceAggregator::aggregate`].
    pub fn aggregate_facts(facts: &LedgerFacts) -> Result<NetBalance, LedgerError> {
        Self::aggregate(&facts.participants, &facts.expense_splits, &facts.payments)
    }
}
