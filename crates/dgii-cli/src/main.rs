//! # dgii CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use dgii_cli::ncf::{run_ncf, NcfArgs};
use dgii_cli::process::{run_process, ProcessArgs};
use dgii_cli::score::{run_score, ScoreArgs};
use dgii_cli::validate::{run_validate, ValidateArgs};
use dgii_cli::Settings;

/// DGII fiscal validation toolchain.
///
/// Cross-validates invoice tax fields against Dominican statutory rates,
/// scores extraction confidence, and resolves the filing status of
/// AI-extracted invoices.
#[derive(Parser, Debug)]
#[command(name = "dgii", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Relative tolerance for rate checks (overrides DGII_TOLERANCE).
    #[arg(long, global = true, value_name = "FRACTION")]
    tolerance: Option<Decimal>,

    /// Confidence below which valid invoices go to review
    /// (overrides DGII_REVIEW_THRESHOLD).
    #[arg(long, global = true, value_name = "FRACTION")]
    review_threshold: Option<f64>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a tax-input record against statutory rates.
    Validate(ValidateArgs),

    /// Score the extraction confidence of a provider response.
    Score(ScoreArgs),

    /// Normalize, validate and score a provider response.
    Process(ProcessArgs),

    /// Check an NCF and look up its type.
    Ncf(NcfArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "dgii CLI starting");

    let settings = match Settings::resolve(cli.tolerance, cli.review_threshold, cli.pretty) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    tracing::debug!(
        tolerance = %settings.config.tolerance,
        review_threshold = settings.config.review_confidence_threshold,
        "resolved configuration"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &settings, &mut out),
        Commands::Score(args) => run_score(&args, &settings, &mut out),
        Commands::Process(args) => run_process(&args, &settings, &mut out),
        Commands::Ncf(args) => run_ncf(&args, &settings, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
