//! # Extraction Status
//!
//! Combines the validator's verdict and the extraction confidence into the
//! status an invoice is filed under:
//!
//! | Status | Condition |
//! |---|---|
//! | `error` | validation failed |
//! | `review` | valid, but with warnings or confidence below threshold |
//! | `validated` | valid, no warnings, confidence at or above threshold |
//!
//! Low confidence only affects the status. The [`ValidationResult`] keeps
//! `needs_review` tied to its own warnings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dgii_core::ExtractedInvoice;

use crate::confidence::ConfidenceScorer;
use crate::config::ValidatorConfig;
use crate::result::ValidationResult;
use crate::validator::TaxValidator;

/// Filing status of a processed invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Validated,
    Review,
    Error,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::Review => "review",
            Self::Error => "error",
        }
    }

    /// Resolve the status from a validation result and a confidence score.
    pub fn resolve(result: &ValidationResult, confidence: f64, threshold: f64) -> Self {
        if !result.is_valid() {
            Self::Error
        } else if result.needs_review() || confidence < threshold {
            Self::Review
        } else {
            Self::Validated
        }
    }
}

impl std::fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything decided about one extracted invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub status: ExtractionStatus,
    pub confidence: f64,
    pub validation: ValidationResult,
}

impl Assessment {
    /// Whether a human has to look at this invoice.
    pub fn needs_review(&self) -> bool {
        self.status != ExtractionStatus::Validated
    }

    /// Serialized validation result for the reviewer, when there is any
    /// finding to show.
    pub fn review_notes(&self) -> Result<Option<String>, serde_json::Error> {
        if !self.validation.has_findings() {
            return Ok(None);
        }
        serde_json::to_string(&self.validation).map(Some)
    }
}

/// Validate, score and resolve an extracted invoice.
pub fn assess(
    invoice: &ExtractedInvoice,
    validator: &TaxValidator,
    scorer: &ConfidenceScorer,
    threshold: f64,
) -> Assessment {
    assess_at(invoice, validator, scorer, threshold, Utc::now())
}

/// [`assess`] with an explicit reference instant for NCF expiry.
pub fn assess_at(
    invoice: &ExtractedInvoice,
    validator: &TaxValidator,
    scorer: &ConfidenceScorer,
    threshold: f64,
    now: DateTime<Utc>,
) -> Assessment {
    let validation = validator.validate_at(&invoice.tax_input(), now);
    let confidence = scorer.score(invoice);
    let status = ExtractionStatus::resolve(&validation, confidence, threshold);

    tracing::debug!(
        ncf = %invoice.ncf,
        status = %status,
        confidence,
        "invoice assessed"
    );

    Assessment {
        status,
        confidence,
        validation,
    }
}

/// Validator, scorer and threshold bundled from one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceAssessor {
    validator: TaxValidator,
    scorer: ConfidenceScorer,
    review_threshold: f64,
}

impl InvoiceAssessor {
    pub fn new(config: &ValidatorConfig) -> Self {
        Self {
            validator: TaxValidator::from_config(config),
            scorer: ConfidenceScorer::new(),
            review_threshold: config.review_confidence_threshold,
        }
    }

    pub fn validator(&self) -> &TaxValidator {
        &self.validator
    }

    pub fn scorer(&self) -> &ConfidenceScorer {
        &self.scorer
    }

    pub fn assess(&self, invoice: &ExtractedInvoice) -> Assessment {
        assess(invoice, &self.validator, &self.scorer, self.review_threshold)
    }

    pub fn assess_at(&self, invoice: &ExtractedInvoice, now: DateTime<Utc>) -> Assessment {
        assess_at(invoice, &self.validator, &self.scorer, self.review_threshold, now)
    }
}

impl Default for InvoiceAssessor {
    fn default() -> Self {
        Self::new(&ValidatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ComputedValues, FindingCode, ValidationIssue, ValidationWarning};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn result(errors: usize, warnings: usize) -> ValidationResult {
        ValidationResult::new(
            (0..errors)
                .map(|_| ValidationIssue::new("monto_servicios", FindingCode::NoAmounts, "x"))
                .collect(),
            (0..warnings)
                .map(|_| ValidationWarning::new("descuento", FindingCode::DescuentoExceedsSubtotal, "x"))
                .collect(),
            ComputedValues::default(),
        )
    }

    #[test]
    fn resolve_table() {
        assert_eq!(ExtractionStatus::resolve(&result(1, 0), 1.0, 0.85), ExtractionStatus::Error);
        assert_eq!(ExtractionStatus::resolve(&result(1, 1), 0.0, 0.85), ExtractionStatus::Error);
        assert_eq!(ExtractionStatus::resolve(&result(0, 1), 1.0, 0.85), ExtractionStatus::Review);
        assert_eq!(ExtractionStatus::resolve(&result(0, 0), 0.84, 0.85), ExtractionStatus::Review);
        assert_eq!(ExtractionStatus::resolve(&result(0, 0), 0.85, 0.85), ExtractionStatus::Validated);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ExtractionStatus::Review).unwrap(), "\"review\"");
        assert_eq!(ExtractionStatus::Validated.to_string(), "validated");
    }

    fn good_invoice() -> ExtractedInvoice {
        ExtractedInvoice {
            ncf: "B0100000001".to_string(),
            tipo_ncf: "B01".to_string(),
            rnc_emisor: "131047939".to_string(),
            nombre_emisor: "Ferreteria Ochoa".to_string(),
            fecha_factura: NaiveDate::from_ymd_opt(2025, 1, 25),
            subtotal: dec!(1000),
            itbis: dec!(180),
            itbis_tasa: dec!(18),
            total: dec!(1180),
            ..Default::default()
        }
    }

    #[test]
    fn clean_invoice_is_validated_without_notes() {
        let assessment = InvoiceAssessor::default().assess_at(&good_invoice(), now());
        assert_eq!(assessment.status, ExtractionStatus::Validated);
        assert_eq!(assessment.confidence, 1.0);
        assert!(!assessment.needs_review());
        assert_eq!(assessment.review_notes().unwrap(), None);
    }

    #[test]
    fn low_confidence_routes_to_review_without_touching_result() {
        let mut invoice = good_invoice();
        invoice.rnc_emisor.clear();
        invoice.nombre_emisor.clear();

        let assessment = InvoiceAssessor::default().assess_at(&invoice, now());
        assert_eq!(assessment.confidence, 0.8);
        assert_eq!(assessment.status, ExtractionStatus::Review);
        assert!(assessment.validation.is_valid());
        assert!(!assessment.validation.needs_review());
        assert_eq!(assessment.review_notes().unwrap(), None);
    }

    #[test]
    fn failing_invoice_carries_notes() {
        let mut invoice = good_invoice();
        invoice.total = dec!(5000);

        let assessment = InvoiceAssessor::default().assess_at(&invoice, now());
        assert_eq!(assessment.status, ExtractionStatus::Error);
        let notes = assessment.review_notes().unwrap().unwrap();
        assert!(notes.contains("total_mismatch"));
    }

    #[test]
    fn threshold_comes_from_config() {
        let config = ValidatorConfig {
            review_confidence_threshold: 1.0,
            ..Default::default()
        };
        let mut invoice = good_invoice();
        invoice.nombre_emisor.clear();
        assert_eq!(
            InvoiceAssessor::new(&config).assess_at(&invoice, now()).status,
            ExtractionStatus::Review
        );
        assert_eq!(
            InvoiceAssessor::default().assess_at(&invoice, now()).status,
            ExtractionStatus::Validated
        );
    }
}
