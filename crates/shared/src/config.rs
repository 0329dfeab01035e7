//! Application configuration management.

use serde::Deserialize;

use crate::types::Money;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Allowed mismatch between an expense total and the sum of its splits,
    /// in minor units per split line. Zero demands an exact match.
    #[serde(default = "default_split_tolerance_per_line")]
    pub split_tolerance_per_line: i64,
}

fn default_split_tolerance_per_line() -> i64 {
    1
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            split_tolerance_per_line: default_split_tolerance_per_line(),
        }
    }
}

impl LedgerConfig {
    /// Returns the per-line tolerance as money.
    #[must_use]
    pub fn split_tolerance(&self) -> Money {
        Money::from_minor(self.split_tolerance_per_line.max(0))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "splitledger=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SPLITLEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
