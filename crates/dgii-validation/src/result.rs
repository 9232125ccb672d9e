//! # Validation Result
//!
//! The output of [`crate::TaxValidator`]. Findings come in two severities:
//!
//! - [`ValidationIssue`] (errors): the invoice is internally inconsistent
//!   or missing a required field. Any error makes the result invalid.
//! - [`ValidationWarning`]: something a human should look at. Warnings
//!   never affect validity.
//!
//! `valid` and `needs_review` are derived from the finding lists when the
//! result is built and cannot be set independently.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Machine-readable finding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    ItbisMismatch,
    TotalMismatch,
    PropinaMismatch,
    IscTelecomMismatch,
    CdtMismatch,
    NcfInvalidFormat,
    NcfUnknownType,
    NcfExpired,
    MissingPaymentDate,
    MissingRetencionTipo,
    IsrRateMismatch,
    NoAmounts,
    ItbisExentoExceedsBase,
    DescuentoExceedsSubtotal,
}

impl FindingCode {
    /// Return the string representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItbisMismatch => "itbis_mismatch",
            Self::TotalMismatch => "total_mismatch",
            Self::PropinaMismatch => "propina_mismatch",
            Self::IscTelecomMismatch => "isc_telecom_mismatch",
            Self::CdtMismatch => "cdt_mismatch",
            Self::NcfInvalidFormat => "ncf_invalid_format",
            Self::NcfUnknownType => "ncf_unknown_type",
            Self::NcfExpired => "ncf_expired",
            Self::MissingPaymentDate => "missing_payment_date",
            Self::MissingRetencionTipo => "missing_retencion_tipo",
            Self::IsrRateMismatch => "isr_rate_mismatch",
            Self::NoAmounts => "no_amounts",
            Self::ItbisExentoExceedsBase => "itbis_exento_exceeds_base",
            Self::DescuentoExceedsSubtotal => "descuento_exceeds_subtotal",
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blocking finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Input field the finding is about (snake_case input name).
    pub field: String,
    pub code: FindingCode,
    /// Value the statutory rule predicts, rounded to 2 decimals.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected: Option<Decimal>,
    /// Value found on the invoice, rounded to 2 decimals.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual: Option<Decimal>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl ValidationIssue {
    /// An error without expected/actual values.
    pub fn new(field: &str, code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            expected: None,
            actual: None,
            message: message.into(),
        }
    }

    /// Builder: attach the expected and actual values.
    pub fn with_values(mut self, expected: Decimal, actual: Decimal) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

/// A non-blocking finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub code: FindingCode,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(field: &str, code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

/// Reference values recomputed from the statutory rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedValues {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_gravada: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub itbis_esperado: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_esperado: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto_facturado: Decimal,
}

/// Outcome of validating one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    needs_review: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationWarning>,
    computed: ComputedValues,
}

impl ValidationResult {
    /// Assemble a result, deriving `valid` and `needs_review` from the
    /// finding lists.
    pub fn new(
        errors: Vec<ValidationIssue>,
        warnings: Vec<ValidationWarning>,
        computed: ComputedValues,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            needs_review: !warnings.is_empty(),
            errors,
            warnings,
            computed,
        }
    }

    /// True iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True iff there is at least one warning.
    pub fn needs_review(&self) -> bool {
        self.needs_review
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn computed(&self) -> &ComputedValues {
        &self.computed
    }

    /// Whether any finding of either severity carries `code`.
    pub fn has_code(&self, code: FindingCode) -> bool {
        self.errors.iter().any(|e| e.code == code) || self.warnings.iter().any(|w| w.code == code)
    }

    /// Whether there is any finding at all.
    pub fn has_findings(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}
