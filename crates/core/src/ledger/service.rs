//! Settlement facade.
//!
//! The single entry point collaborators call: aggregate an event's facts
//! into net balances, then plan the transfers that settle them. Stateless
//! and safe to call concurrently with different snapshots.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::balance::{BalanceAggregator, NetBalance};
use super::error::LedgerError;
use super::facts::LedgerFacts;
use super::settlement::{SettlementPlanner, SettlementTransfer};

/// Balances and the transfers that settle them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Net balance per participant.
    pub balances: NetBalance,
    /// Suggested transfers, in application order.
    pub transfers: Vec<SettlementTransfer>,
}

impl Settlement {
    /// Re-applies every transfer to a copy of the balances and reports
    /// whether all of them end at exactly zero.
    #[must_use]
    pub fn verify(&self) -> bool {
        let mut remaining = self.balances.clone();
        self.transfers
            .iter()
            .all(|transfer| remaining.apply(transfer).is_ok())
            && remaining.is_settled()
    }
}

/// Settlement engine.
///
/// This service contains pure business logic with no I/O. Every call works
/// on an immutable snapshot supplied by the caller.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Computes balances and a settlement plan for one event.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ParticipantNotInEvent` when a fact references an
    /// unknown participant and `LedgerError::UnbalancedLedger` when the
    /// conservation law does not hold.
    pub fn compute(facts: &LedgerFacts) -> Result<Settlement, LedgerError> {
        let balances = BalanceAggregator::aggregate_facts(facts)?;
        let transfers = SettlementPlanner::plan(&balances)?;

        debug!(
            participants = balances.len(),
            splits = facts.expense_splits.len(),
            payments = facts.payments.len(),
            transfers = transfers.len(),
            "settlement computed"
        );

        Ok(Settlement {
            balances,
            transfers,
        })
    }

    /// Computes settlements for independent events in parallel.
    ///
    /// Results are returned in the same order as `events`; one failing
    /// event does not affect the others.
    #[must_use]
    pub fn compute_many(events: &[LedgerFacts]) -> Vec<Result<Settlement, LedgerError>> {
        events.par_iter().map(Self::compute).collect()
    }
}
