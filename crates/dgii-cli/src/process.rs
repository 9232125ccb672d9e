//! # Process Subcommand
//!
//! The full pipeline on one provider response: normalize, validate, score
//! and resolve the filing status.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dgii_core::ExtractedInvoice;
use dgii_extraction::parse_provider_response;
use dgii_validation::{Assessment, ExtractionStatus, InvoiceAssessor};

use crate::Settings;

/// Arguments for the `dgii process` subcommand.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Provider response file, or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Include the normalized invoice in the output.
    #[arg(long)]
    pub with_invoice: bool,
}

#[derive(Debug, Serialize)]
struct ProcessReport<'a> {
    #[serde(flatten)]
    assessment: &'a Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invoice: Option<&'a ExtractedInvoice>,
}

/// Execute the process subcommand.
///
/// Returns exit code: 0 for `validated` and `review`, 1 for `error`.
pub fn run_process(args: &ProcessArgs, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let raw = crate::read_input(&args.path)?;
    process_document(&raw, args.with_invoice, settings, out)
}

/// Process an in-memory provider response.
pub fn process_document(
    raw: &str,
    with_invoice: bool,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<u8> {
    let invoice = parse_provider_response(raw).context("failed to read provider response")?;
    let assessment = InvoiceAssessor::new(&settings.config).assess(&invoice);

    tracing::info!(
        ncf = %invoice.ncf,
        status = %assessment.status,
        confidence = assessment.confidence,
        "processed invoice"
    );

    let report = ProcessReport {
        assessment: &assessment,
        review_notes: assessment
            .review_notes()
            .context("failed to serialize review notes")?,
        invoice: with_invoice.then_some(&invoice),
    };
    crate::write_json(out, &report, settings.pretty)?;

    Ok(match assessment.status {
        ExtractionStatus::Error => 1,
        ExtractionStatus::Validated | ExtractionStatus::Review => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{
        "ncf": "B0100000001",
        "tipoNcf": "B01",
        "rncEmisor": "131047939",
        "nombreEmisor": "Ferreteria Ochoa",
        "fechaFactura": "2025-01-25",
        "subtotal": 1000,
        "itbis": 180,
        "itbisTasa": 18,
        "total": 1180
    }"#;

    fn run(raw: &str, with_invoice: bool) -> (u8, serde_json::Value) {
        let mut out = Vec::new();
        let code = process_document(raw, with_invoice, &Settings::default(), &mut out).unwrap();
        (code, serde_json::from_slice(&out).unwrap())
    }

    #[test]
    fn clean_response_is_validated() {
        let (code, value) = run(GOOD, false);
        assert_eq!(code, 0);
        assert_eq!(value["status"], "validated");
        assert_eq!(value["confidence"], 1.0);
        assert_eq!(value["validation"]["valid"], true);
        assert!(value.get("review_notes").is_none());
        assert!(value.get("invoice").is_none());
    }

    #[test]
    fn inconsistent_total_is_error_with_notes() {
        let raw = GOOD.replace("\"total\": 1180", "\"total\": 9000");
        let (code, value) = run(&raw, true);
        assert_eq!(code, 1);
        assert_eq!(value["status"], "error");
        let notes = value["review_notes"].as_str().unwrap();
        assert!(notes.contains("total_mismatch"));
        assert_eq!(value["invoice"]["ncf"], "B0100000001");
    }

    #[test]
    fn sparse_response_goes_to_review() {
        let (code, value) = run(r#"{"subtotal": 100, "itbis": 18, "total": 118}"#, false);
        assert_eq!(code, 0);
        assert_eq!(value["status"], "review");
        assert_eq!(value["validation"]["valid"], true);
    }
}
