//! Expense input types and their normalisation into split lines.
//!
//! Callers describe how an expense is divided with a closed two-variant
//! request. Both variants normalise to the same `SplitLine` list before the
//! split validator sees them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{Money, ParticipantId};

/// One line of an expense split: `debtor` owes `amount` to the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLine {
    /// The participant who owes this share.
    pub debtor: ParticipantId,
    /// The owed share.
    pub amount: Money,
}

impl SplitLine {
    /// Creates a split line.
    #[must_use]
    pub const fn new(debtor: ParticipantId, amount: Money) -> Self {
        Self { debtor, amount }
    }
}

/// How an expense total is divided among debtors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitRequest {
    /// Divide the total equally with [`Money::split_equal`]; the rounding
    /// residue goes to the first debtor in the given order. A total smaller
    /// than the number of debtors leaves someone with a zero share, which
    /// the validator rejects as `InvalidAmount`.
    Equal {
        /// Debtors sharing the expense, in order.
        debtors: Vec<ParticipantId>,
    },
    /// Explicit per-debtor amounts.
    Custom {
        /// The split lines, in order.
        lines: Vec<SplitLine>,
    },
}

impl SplitRequest {
    /// Normalises the request into split lines for `total`.
    #[must_use]
    pub fn lines(&self, total: Money) -> Vec<SplitLine> {
        match self {
            Self::Equal { debtors } => debtors
                .iter()
                .zip(total.split_equal(debtors.len()))
                .map(|(debtor, amount)| SplitLine::new(*debtor, amount))
                .collect(),
            Self::Custom { lines } => lines.clone(),
        }
    }
}

/// Input for recording or replacing an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// The participant who paid the whole expense.
    pub payer: ParticipantId,
    /// The declared expense total.
    pub total: Money,
    /// How the total is divided.
    pub split: SplitRequest,
    /// Free-text description; opaque to the engine.
    #[serde(default)]
    pub description: String,
    /// Date the expense was incurred; opaque to the engine.
    #[serde(default)]
    pub incurred_on: Option<NaiveDate>,
}

impl ExpenseInput {
    /// Creates an equally split expense.
    #[must_use]
    pub fn equal(payer: ParticipantId, total: Money, debtors: Vec<ParticipantId>) -> Self {
        Self {
            payer,
            total,
            split: SplitRequest::Equal { debtors },
            description: String::new(),
            incurred_on: None,
        }
    }

    /// Creates an expense with explicit split lines.
    #[must_use]
    pub fn custom(payer: ParticipantId, total: Money, lines: Vec<SplitLine>) -> Self {
        Self {
            payer,
            total,
            split: SplitRequest::Custom { lines },
            description: String::new(),
            incurred_on: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Normalised split lines for this expense.
    #[must_use]
    pub fn lines(&self) -> Vec<SplitLine> {
        self.split.lines(self.total)
    }
}
