//! Core business logic for Splitledger.
//!
//! This crate contains the balance and settlement engine with ZERO web or
//! database dependencies. Collaborators hand it the full fact snapshot of
//! an event and receive net balances plus suggested transfers.
//!
//! # Modules
//!
//! - `ledger` - Facts, split validation, aggregation, settlement planning

pub mod ledger;

pub use ledger::{
    EventLedger, ExpenseInput, LedgerError, LedgerFacts, NetBalance, Settlement,
    SettlementEngine, SettlementTransfer, SplitValidator,
};
