//! # dgii-cli: CLI Tool for the DGII Validation Stack
//!
//! Provides the `dgii` command-line interface over the extraction and
//! validation crates.
//!
//! ## Subcommands
//!
//! - `dgii validate`: Validate a flat tax-input record.
//! - `dgii score`: Confidence score of a provider response.
//! - `dgii process`: Provider response to filing status, end to end.
//! - `dgii ncf`: NCF format check and type lookup.
//!
//! Every subcommand that reads JSON accepts a file path or `-` for stdin
//! and writes JSON to stdout:
//!
//! ```bash
//! dgii validate invoice.json
//! cat response.json | dgii process - --pretty
//! dgii ncf B0100000001
//! ```
//!
//! ## Exit Codes
//!
//! `0` when the input passes, `1` when it has blocking findings or the
//! command failed.

pub mod ncf;
pub mod process;
pub mod score;
pub mod validate;

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use dgii_validation::ValidatorConfig;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Settings {
    pub config: ValidatorConfig,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Settings {
    /// Resolve settings from the environment, then apply command-line
    /// overrides.
    pub fn resolve(
        tolerance: Option<Decimal>,
        review_threshold: Option<f64>,
        pretty: bool,
    ) -> Result<Self> {
        let config = ValidatorConfig::from_env().context("invalid environment configuration")?;
        Self::with_overrides(config, tolerance, review_threshold, pretty)
    }

    /// Apply command-line overrides on top of `config`.
    pub fn with_overrides(
        mut config: ValidatorConfig,
        tolerance: Option<Decimal>,
        review_threshold: Option<f64>,
        pretty: bool,
    ) -> Result<Self> {
        if let Some(tolerance) = tolerance {
            config = config
                .with_tolerance(tolerance)
                .context("invalid --tolerance")?;
        }
        if let Some(threshold) = review_threshold {
            config = config
                .with_review_threshold(threshold)
                .context("invalid --review-threshold")?;
        }
        Ok(Self { config, pretty })
    }
}

/// Read an input document. `-` reads standard input.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read standard input")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write `value` as one JSON document followed by a newline.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    writeln!(out, "{rendered}").context("failed to write output")?;
    Ok(())
}
