//! # Error Hierarchy
//!
//! Construction errors for the domain primitives, built with `thiserror`.
//!
//! Tax-rule findings (ITBIS mismatch, expired NCF, ...) are not errors in
//! this sense: they are data carried by the validation result.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each error carries the rejected input and the expected format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// NCF does not match the DGII pattern.
    #[error("invalid NCF format: \"{0}\" (expected B or E followed by 10-12 digits)")]
    InvalidNcf(String),

    /// RNC/cédula does not have a valid length.
    #[error("invalid RNC format: \"{0}\" (expected 9-digit RNC or 11-digit cédula)")]
    InvalidRnc(String),

    /// ISC category outside the fixed enumeration.
    #[error("unknown ISC category: \"{0}\" (expected seguros, telecom, alcohol, tabaco, vehiculos or combustibles)")]
    UnknownIscCategory(String),
}
