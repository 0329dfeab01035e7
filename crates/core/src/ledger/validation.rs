//! Split validation for expense creation and replacement.
//!
//! Creating and replacing an expense both go through `SplitValidator`, so
//! the two paths always accept exactly the same inputs.

use std::collections::BTreeSet;

use splitledger_shared::config::LedgerConfig;
use splitledger_shared::types::{Money, ParticipantId};

use super::error::LedgerError;
use super::types::SplitLine;

/// Checks that an expense's split lines are well-formed.
///
/// Rules, first failure wins:
/// 1. at least one split line
/// 2. expense total and every line amount are positive
/// 3. payer and every debtor belong to the event
/// 4. lines sum to the total within `tolerance_per_line × line count`
///
/// A line sum that leaves the `Money` range fails rule 4 with
/// `LedgerError::AmountOverflow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitValidator {
    tolerance_per_line: Money,
}

impl Default for SplitValidator {
    fn default() -> Self {
        Self::new(Money::MINOR_UNIT)
    }
}

impl SplitValidator {
    /// Creates a validator with the given per-line tolerance.
    #[must_use]
    pub const fn new(tolerance_per_line: Money) -> Self {
        Self { tolerance_per_line }
    }

    /// Creates a validator that requires an exact match.
    #[must_use]
    pub const fn exact() -> Self {
        Self::new(Money::ZERO)
    }

    /// Creates a validator from configuration.
    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.split_tolerance())
    }

    /// Returns the accepted mismatch for `line_count` lines.
    #[must_use]
    pub fn tolerance_for(&self, line_count: usize) -> Money {
        i64::try_from(line_count)
            .ok()
            .and_then(|count| self.tolerance_per_line.abs().checked_mul(count))
            .unwrap_or(Money::ZERO)
    }

    /// Validates the split lines of one expense.
    ///
    /// # Errors
    ///
    /// Returns the `LedgerError` for the first rule that fails.
    pub fn validate(
        &self,
        participants: &BTreeSet<ParticipantId>,
        payer: ParticipantId,
        total: Money,
        lines: &[SplitLine],
    ) -> Result<(), LedgerError> {
        if lines.is_empty() {
            return Err(LedgerError::EmptySplits);
        }

        if !total.is_positive() {
            return Err(LedgerError::InvalidAmount(total));
        }
        if let Some(line) = lines.iter().find(|l| !l.amount.is_positive()) {
            return Err(LedgerError::InvalidAmount(line.amount));
        }

        if !participants.contains(&payer) {
            return Err(LedgerError::ParticipantNotInEvent(payer));
        }
        if let Some(line) = lines.iter().find(|l| !participants.contains(&l.debtor)) {
            return Err(LedgerError::ParticipantNotInEvent(line.debtor));
        }

        let actual = Money::checked_sum(lines.iter().map(|l| l.amount))
            .ok_or(LedgerError::AmountOverflow)?;
        let difference = actual
            .checked_sub(total)
            .ok_or(LedgerError::AmountOverflow)?;
        let tolerance = self.tolerance_for(lines.len());
        if !difference.is_zero_within(tolerance) {
            return Err(LedgerError::SplitMismatch {
                expected: total,
                actual,
                tolerance,
            });
        }

        Ok(())
    }
}
