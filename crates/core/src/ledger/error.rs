//! Ledger error types for validation and invariant failures.
//!
//! Every error here is recoverable and reportable. The engine knows nothing
//! about transports: collaborators map `LedgerError` into
//! `splitledger_shared::AppError` through the `From` impl below.

use splitledger_shared::AppError;
use splitledger_shared::types::{ExpenseId, Money, ParticipantId, PaymentId};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Expense has no split lines.
    #[error("Expense must have at least one split")]
    EmptySplits,

    /// An amount supplied to a fact or expense is zero or negative.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// A referenced participant does not belong to the event.
    #[error("Participant {0} is not part of this event")]
    ParticipantNotInEvent(ParticipantId),

    /// Split lines do not add up to the expense total.
    #[error("Splits do not match expense total. Expected: {expected}, Actual: {actual}, Tolerance: {tolerance}")]
    SplitMismatch {
        /// Declared expense total.
        expected: Money,
        /// Sum of the split lines.
        actual: Money,
        /// Largest accepted difference.
        tolerance: Money,
    },

    /// Payment sender and receiver are the same participant.
    #[error("Payment sender and receiver must differ (participant {0})")]
    SelfPayment(ParticipantId),

    /// A sum of amounts leaves the representable range.
    #[error("Amounts are too large to add up")]
    AmountOverflow,

    // ========== Invariant Errors ==========
    /// Debts and credits entering the planner do not cancel out.
    #[error("Ledger is unbalanced. Owed: {owed}, Receivable: {receivable}")]
    UnbalancedLedger {
        /// Total amount owed by debtors.
        owed: Money,
        /// Total amount receivable by creditors.
        receivable: Money,
    },

    // ========== Event Ledger Errors ==========
    /// Participant is already part of the event.
    #[error("Participant {0} is already part of this event")]
    DuplicateParticipant(ParticipantId),

    /// Expense id is already recorded.
    #[error("Expense {0} already exists")]
    DuplicateExpense(ExpenseId),

    /// Payment id is already recorded.
    #[error("Payment {0} already exists")]
    DuplicatePayment(PaymentId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Participant still has expenses or payments and cannot be removed.
    #[error("Participant {0} has expenses or payments and cannot be removed")]
    ParticipantHasActivity(ParticipantId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySplits => "EMPTY_SPLITS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::ParticipantNotInEvent(_) => "PARTICIPANT_NOT_IN_EVENT",
            Self::SplitMismatch { .. } => "SPLIT_MISMATCH",
            Self::SelfPayment(_) => "SELF_PAYMENT",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::UnbalancedLedger { .. } => "UNBALANCED_LEDGER",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::DuplicateExpense(_) => "DUPLICATE_EXPENSE",
            Self::DuplicatePayment(_) => "DUPLICATE_PAYMENT",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::ParticipantHasActivity(_) => "PARTICIPANT_HAS_ACTIVITY",
        }
    }

    /// Returns true if this error signals a bug in fact construction rather
    /// than bad user input.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::UnbalancedLedger { .. })
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::EmptySplits
            | LedgerError::InvalidAmount(_)
            | LedgerError::ParticipantNotInEvent(_)
            | LedgerError::SplitMismatch { .. }
            | LedgerError::SelfPayment(_)
            | LedgerError::AmountOverflow => Self::Validation(err.to_string()),

            LedgerError::ExpenseNotFound(_) | LedgerError::PaymentNotFound(_) => {
                Self::NotFound(err.to_string())
            }

            LedgerError::DuplicateParticipant(_)
            | LedgerError::DuplicateExpense(_)
            | LedgerError::DuplicatePayment(_)
            | LedgerError::ParticipantHasActivity(_) => Self::Conflict(err.to_string()),

            // Details stay in the logs; callers only learn that it failed.
            LedgerError::UnbalancedLedger { .. } => {
                Self::Internal("settlement could not be computed".to_string())
            }
        }
    }
}
