//! Tide command-line tool.
//!
//! Runs scripted ledger scenarios and quotes interest for a single position.

mod scenario;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tide_accrual::AccrualEngine;
use tide_core::traits::AccrualCalculator;
use tide_core::types::{Amount, Rate};
use tracing::{error, info};

use crate::scenario::Scenario;

/// Tide: a token ledger whose balances earn simple interest.
#[derive(Parser, Debug)]
#[command(name = "tide", version, about = "Interest-accruing token ledger tools")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a JSON scenario file and print one JSON report per step.
    Run {
        /// Path to the scenario file
        script: PathBuf,

        /// Stop with a non-zero exit at the first rejected step
        #[arg(long)]
        fail_fast: bool,
    },
    /// Interest earned by a principal at a fixed rate over a period.
    Quote {
        /// Principal in base units
        #[arg(long)]
        principal: Amount,

        /// Per-second rate scaled by 1e18
        #[arg(long)]
        rate: Rate,

        /// Elapsed seconds
        #[arg(long)]
        elapsed: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    if let Err(e) = execute(cli.command) {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn execute(command: Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Run { script, fail_fast } => {
            let scenario = Scenario::load(&script)?;
            info!(path = %script.display(), steps = scenario.steps.len(), "running scenario");
            let summary = scenario.run(fail_fast, &mut out)?;
            if summary.rejected > 0 {
                info!(rejected = summary.rejected, "some steps were rejected");
            }
        }
        Command::Quote {
            principal,
            rate,
            elapsed,
        } => {
            let engine = AccrualEngine::new();
            let interest = engine.accrued_interest(principal, rate, elapsed)?;
            let balance = engine.accrued_balance(principal, rate, elapsed)?;
            writeln!(out, "interest: {interest}")?;
            writeln!(out, "balance:  {balance}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Initialize the tracing subscriber on stderr, keeping stdout for reports.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}
