//! # Extraction Confidence
//!
//! Scores how complete and self-consistent an extracted invoice looks.
//! The score drives review routing (see [`crate::status`]), it says nothing
//! about fiscal correctness, which is the validator's job.
//!
//! Criteria are grouped in three tiers:
//!
//! | Tier | Criteria | Points each |
//! |---|---|---|
//! | Critical | NCF, issuer RNC, positive total, ITBIS non-negative | 0.15 |
//! | Important | invoice date, positive subtotal, NCF type, issuer name | 0.05 |
//! | Bonus | NCF well formed, total matches subtotal + ITBIS | 0.10 |
//!
//! Points are summed as decimals and capped at 1.0 before the single
//! conversion to `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use dgii_core::{ExtractedInvoice, Ncf};

/// Relative tolerance for the total consistency bonus.
const TOTAL_CONSISTENCY_TOLERANCE: Decimal = dec!(0.05);

/// Weight class of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Critical,
    Important,
    Bonus,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Bonus => "bonus",
        }
    }
}

/// One scoring criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    NcfPresent,
    RncEmisorPresent,
    TotalPositive,
    ItbisNonNegative,
    FechaFacturaPresent,
    SubtotalPositive,
    TipoNcfPresent,
    NombreEmisorPresent,
    NcfWellFormed,
    TotalConsistent,
}

impl Criterion {
    /// All criteria in evaluation order.
    pub fn all() -> &'static [Criterion] {
        &[
            Self::NcfPresent,
            Self::RncEmisorPresent,
            Self::TotalPositive,
            Self::ItbisNonNegative,
            Self::FechaFacturaPresent,
            Self::SubtotalPositive,
            Self::TipoNcfPresent,
            Self::NombreEmisorPresent,
            Self::NcfWellFormed,
            Self::TotalConsistent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NcfPresent => "ncf_present",
            Self::RncEmisorPresent => "rnc_emisor_present",
            Self::TotalPositive => "total_positive",
            Self::ItbisNonNegative => "itbis_non_negative",
            Self::FechaFacturaPresent => "fecha_factura_present",
            Self::SubtotalPositive => "subtotal_positive",
            Self::TipoNcfPresent => "tipo_ncf_present",
            Self::NombreEmisorPresent => "nombre_emisor_present",
            Self::NcfWellFormed => "ncf_well_formed",
            Self::TotalConsistent => "total_consistent",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::NcfPresent | Self::RncEmisorPresent | Self::TotalPositive | Self::ItbisNonNegative => {
                Tier::Critical
            }
            Self::FechaFacturaPresent
            | Self::SubtotalPositive
            | Self::TipoNcfPresent
            | Self::NombreEmisorPresent => Tier::Important,
            Self::NcfWellFormed | Self::TotalConsistent => Tier::Bonus,
        }
    }

    /// Points awarded when the criterion holds.
    pub fn points(&self) -> Decimal {
        match self.tier() {
            Tier::Critical => dec!(0.15),
            Tier::Important => dec!(0.05),
            Tier::Bonus => dec!(0.10),
        }
    }

    /// Whether `invoice` satisfies this criterion.
    pub fn holds(&self, invoice: &ExtractedInvoice) -> bool {
        match self {
            Self::NcfPresent => !invoice.ncf.is_empty(),
            Self::RncEmisorPresent => !invoice.rnc_emisor.is_empty(),
            Self::TotalPositive => invoice.total > Decimal::ZERO,
            // Missing ITBIS is zero, which passes.
            Self::ItbisNonNegative => invoice.itbis >= Decimal::ZERO,
            Self::FechaFacturaPresent => invoice.fecha_factura.is_some(),
            Self::SubtotalPositive => invoice.subtotal > Decimal::ZERO,
            Self::TipoNcfPresent => !invoice.tipo_ncf.is_empty(),
            Self::NombreEmisorPresent => !invoice.nombre_emisor.is_empty(),
            Self::NcfWellFormed => Ncf::is_well_formed(&invoice.ncf),
            Self::TotalConsistent => {
                invoice.total > Decimal::ZERO
                    && invoice.subtotal > Decimal::ZERO
                    && (invoice.total - (invoice.subtotal + invoice.itbis)).abs()
                        <= invoice.total * TOTAL_CONSISTENCY_TOLERANCE
            }
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores extracted invoices in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Criteria that awarded points, in evaluation order.
    pub fn breakdown(&self, invoice: &ExtractedInvoice) -> Vec<Criterion> {
        Criterion::all()
            .iter()
            .copied()
            .filter(|c| c.holds(invoice))
            .collect()
    }

    /// Capped point total as a decimal.
    pub fn points(&self, invoice: &ExtractedInvoice) -> Decimal {
        let sum: Decimal = self.breakdown(invoice).iter().map(Criterion::points).sum();
        sum.min(Decimal::ONE)
    }

    /// Confidence in `[0.0, 1.0]`.
    pub fn score(&self, invoice: &ExtractedInvoice) -> f64 {
        self.points(invoice).to_f64().unwrap_or_default()
    }
}
