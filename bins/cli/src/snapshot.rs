//! Snapshot files: one event's participants, expenses and payments as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use splitledger_core::{EventLedger, ExpenseInput, SplitValidator};
use splitledger_shared::AppResult;
use splitledger_shared::types::{EventId, ExpenseId, Money, ParticipantId, PaymentId};

/// Raw snapshot as read from disk.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    /// Event id; a fresh one is generated when absent.
    #[serde(default)]
    pub event: Option<EventId>,
    pub participants: Vec<ParticipantEntry>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub payments: Vec<PaymentEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantEntry {
    pub id: ParticipantId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseEntry {
    #[serde(default)]
    pub id: Option<ExpenseId>,
    #[serde(flatten)]
    pub input: ExpenseInput,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEntry {
    #[serde(default)]
    pub id: Option<PaymentId>,
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    /// Parses a snapshot from JSON text.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replays the snapshot into a validated event ledger.
    ///
    /// Every write goes through the ledger, so a bad split or an unknown
    /// participant fails here with the ledger's error.
    pub fn into_ledger(self, validator: SplitValidator) -> AppResult<EventLedger> {
        let mut ledger = EventLedger::new(self.event.unwrap_or_default(), validator);

        for participant in self.participants {
            ledger.add_participant(participant.id, participant.name)?;
        }
        for expense in self.expenses {
            ledger.record_expense(expense.id.unwrap_or_default(), expense.input)?;
        }
        for payment in self.payments {
            ledger.record_payment(
                payment.id.unwrap_or_default(),
                payment.from,
                payment.to,
                payment.amount,
                payment.paid_on,
            )?;
        }

        Ok(ledger)
    }
}
