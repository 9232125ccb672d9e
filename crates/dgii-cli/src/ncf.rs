//! # NCF Subcommand
//!
//! Checks the format of a Número de Comprobante Fiscal and looks up its
//! type in the DGII table.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dgii_core::Ncf;

use crate::Settings;

/// Arguments for the `dgii ncf` subcommand.
#[derive(Args, Debug)]
pub struct NcfArgs {
    /// The NCF to check, e.g. `B0100000001`.
    #[arg(value_name = "NCF")]
    pub ncf: String,
}

#[derive(Debug, Serialize)]
struct NcfReport<'a> {
    ncf: &'a str,
    well_formed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    electronic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'static str>,
}

/// Execute the ncf subcommand.
///
/// Returns exit code: 0 when well formed, 1 otherwise. An unknown type
/// code is reported with no description but does not fail.
pub fn run_ncf(args: &NcfArgs, settings: &Settings, out: &mut dyn Write) -> Result<u8> {
    let raw = args.ncf.trim();
    let report = match Ncf::new(raw) {
        Ok(ncf) => NcfReport {
            ncf: raw,
            well_formed: true,
            electronic: Some(ncf.is_electronic()),
            type_code: Some(&raw[..3]),
            description: ncf.ncf_type().map(|t| t.description),
        },
        Err(e) => {
            tracing::debug!(error = %e, "NCF rejected");
            NcfReport {
                ncf: raw,
                well_formed: false,
                electronic: None,
                type_code: None,
                description: None,
            }
        }
    };

    let code = if report.well_formed { 0 } else { 1 };
    crate::write_json(out, &report, settings.pretty)?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ncf: &str) -> (u8, serde_json::Value) {
        let mut out = Vec::new();
        let args = NcfArgs { ncf: ncf.to_string() };
        let code = run_ncf(&args, &Settings::default(), &mut out).unwrap();
        (code, serde_json::from_slice(&out).unwrap())
    }

    #[test]
    fn known_type() {
        let (code, value) = run("B0100000001");
        assert_eq!(code, 0);
        assert_eq!(value["well_formed"], true);
        assert_eq!(value["electronic"], false);
        assert_eq!(value["type_code"], "B01");
        assert!(value["description"].as_str().unwrap().contains("Crédito Fiscal"));
    }

    #[test]
    fn electronic_ncf() {
        let (code, value) = run("E310000000001");
        assert_eq!(code, 0);
        assert_eq!(value["electronic"], true);
        assert_eq!(value["type_code"], "E31");
    }

    #[test]
    fn unknown_type_is_not_a_failure() {
        let (code, value) = run("B9900000001");
        assert_eq!(code, 0);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn malformed() {
        let (code, value) = run("X0100000001");
        assert_eq!(code, 1);
        assert_eq!(value["well_formed"], false);
        assert!(value.get("type_code").is_none());
    }
}
