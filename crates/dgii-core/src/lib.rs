//! # dgii-core: Foundational Types for DGII Invoice Processing
//!
//! This crate defines the value types shared by the extraction, validation
//! and CLI crates. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed-point money.** Every amount is a [`rust_decimal::Decimal`].
//!    Tolerance comparisons are exact, so a deviation equal to the
//!    tolerance never flips to an error through binary float drift.
//!
//! 2. **Newtype wrappers for fiscal identifiers.** [`Ncf`] and [`Rnc`]
//!    validate format at construction time.
//!
//! 3. **Immutable statutory tables.** The NCF type table, the ISR
//!    retention table and the NCF format pattern are `'static` data
//!    initialised once and shared freely across threads.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dgii-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod invoice;
pub mod money;
pub mod ncf;
pub mod tax;

pub use error::ValidationError;
pub use identity::{Rnc, TipoId};
pub use invoice::{ExtractedInvoice, InvoiceItem, InvoiceTaxInput, TipoFactura};
pub use money::{non_negative, round2};
pub use ncf::{Ncf, NcfType, NCF_TYPES};
pub use tax::{IscCategory, IsrRetentionType, ItbisRate, ISR_RETENTION_TYPES};
