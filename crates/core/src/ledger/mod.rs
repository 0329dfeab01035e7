//! Shared-expense ledger: balances and settlement.
//!
//! This module implements the engine:
//! - Immutable split and payment facts
//! - Expense input normalisation (equal or custom splits)
//! - Split validation
//! - Net balance aggregation
//! - Greedy settlement planning
//! - The settlement facade
//! - A caller-owned event ledger that assembles fact snapshots

pub mod balance;
pub mod error;
pub mod event;
pub mod facts;
pub mod service;
pub mod settlement;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod settlement_props;
#[cfg(test)]
mod validation_props;

pub use balance::{BalanceAggregator, NetBalance};
pub use error::LedgerError;
pub use event::{EventLedger, ExpenseRecord, PaymentRecord};
pub use facts::{ExpenseSplitFact, LedgerFacts, PaymentFact};
pub use service::{Settlement, SettlementEngine};
pub use settlement::{SettlementPlanner, SettlementTransfer};
pub use types::{ExpenseInput, SplitLine, SplitRequest};
pub use validation::SplitValidator;
