//! # Score Subcommand
//!
//! Normalizes a provider response and prints its confidence score with the
//! criteria that contributed to it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dgii_extraction::parse_provider_response;
use dgii_validation::{ConfidenceScorer, Criterion, Tier};

use crate::Settings;

/// Arguments for the `dgii score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Provider response file, or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    confidence: f64,
    criteria: Vec<CriterionReport>,
}

#[derive(Debug, Serialize)]
struct CriterionReport {
    criterion: Criterion,
    tier: Tier,
    #[serde(with = "rust_decimal::serde::float")]
    points: rust_decimal::Decimal,
}

/// Execute the score subcommand. Always returns exit code 0.
pub fn run_score(args: &ScoreArgs, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let raw = crate::read_input(&args.path)?;
    score_document(&raw, settings, out)
}

/// Score an in-memory provider response.
pub fn score_document(raw: &str, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let invoice = parse_provider_response(raw).context("failed to read provider response")?;
    let scorer = ConfidenceScorer::new();

    let report = ScoreReport {
        confidence: scorer.score(&invoice),
        criteria: scorer
            .breakdown(&invoice)
            .into_iter()
            .map(|criterion| CriterionReport {
                criterion,
                tier: criterion.tier(),
                points: criterion.points(),
            })
            .collect(),
    };

    tracing::info!(confidence = report.confidence, "scored provider response");

    crate::write_json(out, &report, settings.pretty)?;
    Ok(0)
}
