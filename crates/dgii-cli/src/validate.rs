//! # Validate Subcommand
//!
//! Reads a flat `InvoiceTaxInput` JSON record and prints the
//! `ValidationResult`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dgii_core::InvoiceTaxInput;
use dgii_validation::TaxValidator;

use crate::Settings;

/// Arguments for the `dgii validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Tax-input JSON file, or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when there are blocking findings.
pub fn run_validate(args: &ValidateArgs, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let raw = crate::read_input(&args.path)?;
    validate_document(&raw, settings, out)
}

/// Validate an in-memory tax-input document.
pub fn validate_document(raw: &str, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let input: InvoiceTaxInput =
        serde_json::from_str(raw).context("failed to parse tax input JSON")?;

    let result = TaxValidator::from_config(&settings.config).validate(&input);

    tracing::info!(
        valid = result.is_valid(),
        needs_review = result.needs_review(),
        "validated tax input"
    );

    crate::write_json(out, &result, settings.pretty)?;
    Ok(if result.is_valid() { 0 } else { 1 })
}
