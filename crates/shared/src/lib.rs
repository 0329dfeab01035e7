//! Shared types, errors, and configuration for Splitledger.
//!
//! This crate provides common types used across all other crates:
//! - Money type in fixed-point minor units
//! - Typed IDs for type-safe participant/expense/payment references
//! - Application-wide error type for collaborators
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
