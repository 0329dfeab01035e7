//! Settlement reports with participant names resolved.

use std::fmt::Write as _;

use serde::Serialize;
use splitledger_core::{EventLedger, Settlement};
use splitledger_shared::types::{EventId, Money, ParticipantId};

/// A suggested transfer with both endpoints named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledTransfer {
    pub debtor_id: ParticipantId,
    pub debtor_name: String,
    pub creditor_id: ParticipantId,
    pub creditor_name: String,
    pub amount: Money,
}

/// One participant's net balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledBalance {
    pub participant_id: ParticipantId,
    pub name: String,
    pub balance: Money,
}

/// Everything the `settle` command prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub event_id: EventId,
    pub balances: Vec<LabeledBalance>,
    pub transfers: Vec<LabeledTransfer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl SettlementReport {
    /// Builds a report, naming every participant through the ledger.
    pub fn new(ledger: &EventLedger, settlement: &Settlement, verify: bool) -> Self {
        let name = |id: ParticipantId| {
            ledger
                .display_name(id)
                .map_or_else(|| id.to_string(), str::to_owned)
        };

        let balances = settlement
            .balances
            .iter()
            .map(|(id, balance)| LabeledBalance {
                participant_id: id,
                name: name(id),
                balance,
            })
            .collect();

        let transfers = settlement
            .transfers
            .iter()
            .map(|transfer| LabeledTransfer {
                debtor_id: transfer.from,
                debtor_name: name(transfer.from),
                creditor_id: transfer.to,
                creditor_name: name(transfer.to),
                amount: transfer.amount,
            })
            .collect();

        Self {
            event_id: ledger.id(),
            balances,
            transfers,
            verified: verify.then(|| settlement.verify()),
        }
    }

    /// Renders the report as plain text.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let width = self
            .balances
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or(0);

        let _ = writeln!(out, "Balances");
        for line in &self.balances {
            let _ = writeln!(out, "  {:<width$}  {:>12}", line.name, signed(line.balance));
        }

        let _ = writeln!(out);
        if self.transfers.is_empty() {
            let _ = writeln!(out, "Nothing to settle");
        } else {
            let _ = writeln!(out, "Transfers");
            for t in &self.transfers {
                let _ = writeln!(out, "  {} pays {} {}", t.debtor_name, t.creditor_name, t.amount);
            }
        }

        if let Some(verified) = self.verified {
            let _ = writeln!(out);
            let _ = writeln!(out, "Verified: {}", if verified { "yes" } else { "NO" });
        }
        out
    }
}

fn signed(amount: Money) -> String {
    if amount.is_positive() {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}
