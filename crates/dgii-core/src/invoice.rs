//! # Invoice Records
//!
//! Two records flow through the pipeline:
//!
//! - [`ExtractedInvoice`]: the normalized output of AI/OCR extraction, with
//!   identity fields, dates, all monetary components and line items. The
//!   confidence scorer reads this record.
//! - [`InvoiceTaxInput`]: the flat numeric projection consumed by the tax
//!   validator. Every amount defaults to zero and every percentage is a
//!   whole number (18, not 0.18).
//!
//! Both are plain values: built once, read many times, never mutated by
//! the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identity::TipoId;
use crate::tax::IscCategory;

// ---------------------------------------------------------------------------
// Validator input
// ---------------------------------------------------------------------------

/// Normalized tax fields of one invoice, as consumed by the validator.
///
/// Amounts deserialize from JSON numbers or numeric strings. Missing
/// fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceTaxInput {
    // Base amounts
    pub monto_servicios: Decimal,
    pub monto_bienes: Decimal,
    pub descuento: Decimal,

    // ITBIS
    pub itbis_facturado: Decimal,
    /// 18 (standard) or 16 (zona franca).
    pub itbis_tasa: Decimal,
    pub itbis_exento: Decimal,
    pub itbis_retenido: Decimal,
    pub itbis_proporcionalidad: Decimal,
    pub itbis_costo: Decimal,

    // ISC
    pub isc_monto: Decimal,
    #[serde(deserialize_with = "IscCategory::deserialize_optional")]
    pub isc_categoria: Option<IscCategory>,

    // Other charges
    pub cdt_monto: Decimal,
    pub cargo_911: Decimal,
    pub propina_legal: Decimal,
    pub otros_impuestos: Decimal,
    pub monto_no_facturable: Decimal,

    // ISR retention
    /// 0 = no retention, otherwise 1-8.
    pub retencion_isr_tipo: i32,
    pub retencion_isr_monto: Decimal,

    pub total_factura: Decimal,

    pub ncf: String,
    /// `YYYY-MM-DD`.
    pub ncf_vencimiento: Option<String>,

    /// `YYYY-MM-DD`.
    pub fecha_pago: Option<String>,
}

impl InvoiceTaxInput {
    /// Services plus goods, before discount.
    pub fn subtotal(&self) -> Decimal {
        self.monto_servicios + self.monto_bienes
    }

    /// Subtotal minus discount. May be negative for inconsistent input.
    pub fn net_amount(&self) -> Decimal {
        self.subtotal() - self.descuento
    }

    /// The NCF expiry date string, treating empty as absent.
    pub fn ncf_vencimiento(&self) -> Option<&str> {
        non_empty(self.ncf_vencimiento.as_deref())
    }

    /// The payment date string, treating empty as absent.
    pub fn fecha_pago(&self) -> Option<&str> {
        non_empty(self.fecha_pago.as_deref())
    }

    /// Whether ITBIS or ISR was withheld on this invoice.
    pub fn has_retention(&self) -> bool {
        self.itbis_retenido > Decimal::ZERO || self.retencion_isr_monto > Decimal::ZERO
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Extracted invoice
// ---------------------------------------------------------------------------

/// Which DGII purchase/sales report an invoice belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoFactura {
    /// Purchases, reported on the 606.
    #[default]
    Gastos,
    /// Sales, reported on the 607.
    Ingresos,
}

impl TipoFactura {
    /// Classify by NCF type code. Only consumer-final receipts (B02) are
    /// treated as sales; everything else is a purchase.
    pub fn from_tipo_ncf(tipo_ncf: &str) -> Self {
        match tipo_ncf {
            "B02" => Self::Ingresos,
            _ => Self::Gastos,
        }
    }

    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gastos => "gastos",
            Self::Ingresos => "ingresos",
        }
    }
}

/// A line item on an extracted invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceItem {
    pub codigo: String,
    pub descripcion: String,
    pub cantidad: Decimal,
    pub precio_unit: Decimal,
    pub descuento: Decimal,
    pub itbis: Decimal,
    pub importe: Decimal,
    /// Whether ITBIS applies to this line.
    pub is_taxed: bool,
}

/// A normalized invoice as produced by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedInvoice {
    // Comprobante fiscal
    pub ncf: String,
    pub tipo_ncf: String,
    /// NCF being amended, for credit/debit notes.
    pub ncf_modifica: String,

    // Emisor
    pub rnc_emisor: String,
    pub nombre_emisor: String,
    pub tipo_id_emisor: Option<TipoId>,

    // Receptor
    pub rnc_receptor: String,
    pub nombre_receptor: String,
    pub tipo_id_receptor: Option<TipoId>,

    // Fechas
    pub fecha_factura: Option<NaiveDate>,
    /// NCF expiry date printed on the receipt.
    pub fecha_vencimiento: Option<NaiveDate>,
    pub fecha_pago: Option<NaiveDate>,

    // Montos
    pub subtotal: Decimal,
    pub descuento: Decimal,
    pub monto_servicios: Decimal,
    pub monto_bienes: Decimal,
    pub itbis: Decimal,
    pub itbis_tasa: Decimal,
    pub itbis_retenido: Decimal,
    pub itbis_retenido_porcentaje: i32,
    pub itbis_exento: Decimal,
    pub itbis_proporcionalidad: Decimal,
    pub itbis_costo: Decimal,
    pub isr: Decimal,
    pub retencion_isr_tipo: i32,
    pub isc: Decimal,
    pub isc_categoria: Option<IscCategory>,
    pub cdt_monto: Decimal,
    #[serde(rename = "cargo911")]
    pub cargo_911: Decimal,
    pub propina: Decimal,
    pub otros_impuestos: Decimal,
    pub monto_no_facturable: Decimal,
    pub total: Decimal,

    // Clasificacion
    /// 01 = efectivo, 02 = cheque, 03 = tarjeta, ...
    pub forma_pago: String,
    pub tipo_bien_servicio: String,
    pub tipo_factura: TipoFactura,

    pub items: Vec<InvoiceItem>,

    /// OCR text the extraction ran on, when available.
    pub raw_text: String,
}

impl ExtractedInvoice {
    /// Project onto the validator's flat input record.
    ///
    /// When the provider did not split the subtotal into services and
    /// goods, the whole subtotal is attributed to services.
    pub fn tax_input(&self) -> InvoiceTaxInput {
        let (monto_servicios, monto_bienes) =
            if self.monto_servicios.is_zero() && self.monto_bienes.is_zero() {
                (self.subtotal, Decimal::ZERO)
            } else {
                (self.monto_servicios, self.monto_bienes)
            };

        InvoiceTaxInput {
            monto_servicios,
            monto_bienes,
            descuento: self.descuento,
            itbis_facturado: self.itbis,
            itbis_tasa: self.itbis_tasa,
            itbis_exento: self.itbis_exento,
            itbis_retenido: self.itbis_retenido,
            itbis_proporcionalidad: self.itbis_proporcionalidad,
            itbis_costo: self.itbis_costo,
            isc_monto: self.isc,
            isc_categoria: self.isc_categoria,
            cdt_monto: self.cdt_monto,
            cargo_911: self.cargo_911,
            propina_legal: self.propina,
            otros_impuestos: self.otros_impuestos,
            monto_no_facturable: self.monto_no_facturable,
            retencion_isr_tipo: self.retencion_isr_tipo,
            retencion_isr_monto: self.isr,
            total_factura: self.total,
            ncf: self.ncf.clone(),
            ncf_vencimiento: self.fecha_vencimiento.map(format_date),
            fecha_pago: self.fecha_pago.map(format_date),
        }
    }
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
