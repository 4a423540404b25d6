//! # fisco CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fisco_cli::calculate::{run_calculate, CalculateArgs};
use fisco_cli::price::{run_price, PriceArgs};
use fisco_cli::resolve::{run_resolve, ResolveArgs};
use fisco_cli::schedule::{run_schedule, ScheduleArgs};

/// Fisco fiscal computation toolkit.
///
/// Previews installment schedules, applies price adjustments, resolves
/// jurisdiction tax configuration, and calculates document taxes.
#[derive(Parser, Debug)]
#[command(name = "fisco", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preview the installment schedule for a total.
    Schedule(ScheduleArgs),

    /// Apply or reset a price adjustment over a product set.
    Price(PriceArgs),

    /// Resolve the jurisdiction configuration for a route.
    Resolve(ResolveArgs),

    /// Calculate taxes for a document.
    Calculate(CalculateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr; stdout carries command output.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = match cli.command {
        Commands::Schedule(args) => run_schedule(&args),
        Commands::Price(args) => run_price(&args),
        Commands::Resolve(args) => run_resolve(&args),
        Commands::Calculate(args) => run_calculate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_schedule_with_negative_total() {
        let cli = Cli::try_parse_from([
            "fisco",
            "-vv",
            "schedule",
            "--total",
            "-5",
            "--emission",
            "2024-01-15",
            "--installments",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Schedule(args) => {
                assert!(args.total.is_sign_negative());
                assert_eq!(args.installments, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn price_rejects_conflicting_rules() {
        let parsed = Cli::try_parse_from([
            "fisco", "price", "--items", "x.json", "--percent", "5", "--reset",
        ]);
        assert!(parsed.is_err());
    }
}
