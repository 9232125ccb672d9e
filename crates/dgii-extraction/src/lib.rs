//! # dgii-extraction: Provider Output Normalization
//!
//! Sits between the AI/OCR provider and the validation engine. The
//! provider returns loosely-typed JSON; this crate turns it into a
//! [`dgii_core::ExtractedInvoice`], from which the validator's
//! [`dgii_core::InvoiceTaxInput`] is projected.
//!
//! ```text
//! provider JSON --> parse_provider_response --> ExtractedInvoice --> tax_input()
//!                   (coerce, clean, dates)                            |
//!                                                                     v
//!                                                          TaxValidator::validate
//! ```
//!
//! Lenient numeric coercion lives in [`coerce`]. The validator only ever
//! sees canonical decimals.

pub mod clean;
pub mod coerce;
pub mod dates;
pub mod error;
pub mod response;

pub use clean::{clean_ncf, clean_rnc, detect_tipo_id};
pub use dates::parse_date;
pub use error::ExtractionError;
pub use response::{normalize, parse_provider_response, strip_code_fences};
