//! # dgii-validation: Fiscal Cross-Validation and Confidence Scoring
//!
//! Decides whether an extracted DGII invoice can be filed automatically.
//!
//! ```text
//! ExtractedInvoice ──tax_input()──> TaxValidator ──> ValidationResult ─┐
//!        │                                                             ├─> ExtractionStatus
//!        └──────────────────────> ConfidenceScorer ──> f64 ────────────┘
//! ```
//!
//! - [`TaxValidator`] recomputes ITBIS, totals, propina, telecom
//!   surcharges and ISR retentions from statutory rates and reports
//!   deviations beyond a relative tolerance, plus NCF and coherence checks.
//! - [`ConfidenceScorer`] grades how complete the extraction looks.
//! - [`ExtractionStatus::resolve`] combines both into `validated`,
//!   `review` or `error`.
//!
//! Everything here is pure: no I/O, no shared mutable state. The only
//! clock read is [`TaxValidator::validate`], and every entry point has an
//! `_at` variant taking the reference instant explicitly.

pub mod confidence;
pub mod config;
pub mod result;
pub mod status;
pub mod validator;

pub use confidence::{ConfidenceScorer, Criterion, Tier};
pub use config::{ConfigError, ValidatorConfig};
pub use result::{ComputedValues, FindingCode, ValidationIssue, ValidationResult, ValidationWarning};
pub use status::{assess, assess_at, Assessment, ExtractionStatus, InvoiceAssessor};
pub use validator::TaxValidator;
