//! Splitledger CLI
//!
//! Settles a shared-expense event from a JSON snapshot.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use splitledger_core::SplitValidator;
use splitledger_shared::types::Money;
use splitledger_shared::{AppConfig, AppError, config::LogConfig};

mod report;
mod snapshot;

use report::SettlementReport;
use snapshot::Snapshot;

/// splitledger - balances and settlement for shared expenses
#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute balances and suggested transfers for an event snapshot
    Settle {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Re-apply the transfers and report whether every balance reaches zero
        #[arg(long)]
        verify: bool,
    },

    /// Show how a total divides equally into shares
    Split {
        /// Total amount, e.g. 100.00
        total: Money,

        /// Number of shares
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        parts: u16,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.log);

    match cli.command {
        Commands::Settle {
            snapshot,
            format,
            verify,
        } => settle(&config, &snapshot, format, verify),
        Commands::Split { total, parts } => {
            split(total, usize::from(parts));
            Ok(())
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (json, plain) = if log.json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

fn settle(config: &AppConfig, path: &Path, format: Format, verify: bool) -> Result<()> {
    let validator = SplitValidator::from_config(&config.ledger);
    let ledger = Snapshot::read(path)?
        .into_ledger(validator)
        .map_err(|err| report_error(format, err))?;

    let settlement = ledger
        .settle()
        .map_err(|err| report_error(format, err.into()))?;
    info!(
        event_id = %ledger.id(),
        transfers = settlement.transfers.len(),
        "event settled"
    );

    let report = SettlementReport::new(&ledger, &settlement, verify);
    match format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.verified == Some(false) {
        anyhow::bail!("settlement plan failed verification");
    }
    Ok(())
}

fn split(total: Money, parts: usize) {
    for (i, share) in total.split_equal(parts).iter().enumerate() {
        println!("{:>4}  {share}", i + 1);
    }
}

/// Echoes the error body to stdout in JSON mode.
fn report_error(format: Format, err: AppError) -> anyhow::Error {
    if format == Format::Json {
        println!("{}", err.to_body());
    }
    err.into()
}
