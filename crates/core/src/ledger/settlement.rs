//! Settlement planning.
//!
//! Turns net balances into a list of debtor→creditor transfers using greedy
//! two-pointer matching over debtors and creditors in increasing id order.
//! The plan is deterministic and has at most `debtors + creditors - 1`
//! transfers. It is not a minimum-cardinality settlement.

use serde::Serialize;
use splitledger_shared::types::{Money, ParticipantId};
use tracing::error;

use super::balance::NetBalance;
use super::error::LedgerError;

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementTransfer {
    /// The paying participant (currently owes).
    pub from: ParticipantId,
    /// The receiving participant (currently owed).
    pub to: ParticipantId,
    /// Amount to transfer; always positive.
    pub amount: Money,
}

/// Settlement planner over net balances.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Plans transfers that drive every balance to zero when applied in order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnbalancedLedger` if total debt differs from
    /// total credit. That is a defect upstream, never a user error, and no
    /// partial plan is produced. Returns `LedgerError::AmountOverflow` if
    /// the debt or credit total leaves the `Money` range.
    pub fn plan(balances: &NetBalance) -> Result<Vec<SettlementTransfer>, LedgerError> {
        let mut debtors: Vec<(ParticipantId, Money)> = Vec::new();
        let mut creditors: Vec<(ParticipantId, Money)> = Vec::new();

        for (id, balance) in balances.iter() {
            if balance.is_negative() {
                let owed = balance.checked_neg().ok_or(LedgerError::AmountOverflow)?;
                debtors.push((id, owed));
            } else if balance.is_positive() {
                creditors.push((id, balance));
            }
        }

        let owed = Money::checked_sum(debtors.iter().map(|(_, amount)| *amount))
            .ok_or(LedgerError::AmountOverflow)?;
        let receivable = Money::checked_sum(creditors.iter().map(|(_, amount)| *amount))
            .ok_or(LedgerError::AmountOverflow)?;
        if owed != receivable {
            error!(
                %owed,
                %receivable,
                debtors = debtors.len(),
                creditors = creditors.len(),
                "conservation violated: net balances do not sum to zero"
            );
            return Err(LedgerError::UnbalancedLedger { owed, receivable });
        }

        let mut transfers =
            Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let (mut d, mut c) = (0, 0);

        while d < debtors.len() && c < creditors.len() {
            let (debtor, debt) = &mut debtors[d];
            let (creditor, credit) = &mut creditors[c];
            let amount = (*debt).min(*credit);

            transfers.push(SettlementTransfer {
                from: *debtor,
                to: *creditor,
                amount,
            });
            *debt -= amount;
            *credit -= amount;

            if debt.is_zero() {
                d += 1;
            }
            if credit.is_zero() {
                c += 1;
            }
        }

        Ok(transfers)
    }
}
