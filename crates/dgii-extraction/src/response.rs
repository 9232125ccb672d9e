//! # Provider Response Normalization
//!
//! Converts the JSON an AI model returns for an invoice image into an
//! [`ExtractedInvoice`]. The model is asked for a fixed camelCase schema,
//! but in practice any field can be missing, null, a string where a number
//! was requested, or wrapped in a markdown code fence.
//!
//! ## Normalization rules
//!
//! - Amounts go through [`coerce::amount`]; malformed values become zero.
//! - RNCs keep digits only; NCFs keep uppercase alphanumerics.
//! - `tipoIdEmisor` / `tipoIdReceptor` fall back to length detection.
//! - `tipoNcf` falls back to the first three characters of the NCF.
//! - `tipoFactura` is derived from `tipoNcf`.
//! - Line items accept `precioUnitario` and `montoTotal` as aliases, and a
//!   zero quantity is read as one unit.

use serde_json::{Map, Value};

use dgii_core::{ExtractedInvoice, InvoiceItem, IscCategory, TipoFactura, TipoId};
use rust_decimal::Decimal;

use crate::clean::{clean_ncf, clean_rnc, detect_tipo_id};
use crate::coerce;
use crate::dates::parse_date;
use crate::error::ExtractionError;

static NULL: Value = Value::Null;

/// Remove markdown code fences (```` ```json ```` / ```` ``` ````) around a
/// model response.
pub fn strip_code_fences(response: &str) -> &str {
    let mut s = response.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parse a provider response into a normalized invoice.
///
/// # Errors
///
/// Returns [`ExtractionError`] if the response is empty, is not JSON, or
/// is not a JSON object. Field-level problems never fail the parse.
pub fn parse_provider_response(response: &str) -> Result<ExtractedInvoice, ExtractionError> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(cleaned)?;
    match value {
        Value::Object(map) => Ok(normalize(&map)),
        Value::Array(_) => Err(ExtractionError::NotAnObject("array")),
        Value::String(_) => Err(ExtractionError::NotAnObject("string")),
        Value::Number(_) => Err(ExtractionError::NotAnObject("number")),
        Value::Bool(_) => Err(ExtractionError::NotAnObject("boolean")),
        Value::Null => Err(ExtractionError::NotAnObject("null")),
    }
}

/// Normalize an already-decoded provider object.
pub fn normalize(raw: &Map<String, Value>) -> ExtractedInvoice {
    let field = |key: &str| raw.get(key).unwrap_or(&NULL);
    let text = |key: &str| coerce::text(field(key));
    let amount = |key: &str| coerce::amount(field(key));

    let ncf = clean_ncf(&text("ncf"));
    let rnc_emisor = clean_rnc(&text("rncEmisor"));
    let rnc_receptor = clean_rnc(&text("rncReceptor"));

    let mut tipo_ncf = text("tipoNcf").to_ascii_uppercase();
    if tipo_ncf.is_empty() && ncf.len() >= 3 {
        tipo_ncf = ncf[..3].to_string();
    }

    let isc_raw = text("iscCategoria");
    let isc_categoria = if isc_raw.is_empty() {
        None
    } else {
        match isc_raw.parse::<IscCategory>() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unknown ISC category from provider");
                None
            }
        }
    };

    let invoice = ExtractedInvoice {
        tipo_id_emisor: tipo_id(&text("tipoIdEmisor"), &rnc_emisor),
        tipo_id_receptor: tipo_id(&text("tipoIdReceptor"), &rnc_receptor),
        tipo_factura: TipoFactura::from_tipo_ncf(&tipo_ncf),
        ncf,
        tipo_ncf,
        ncf_modifica: clean_ncf(&text("ncfModifica")),
        rnc_emisor,
        nombre_emisor: text("nombreEmisor"),
        rnc_receptor,
        nombre_receptor: text("nombreReceptor"),

        fecha_factura: parse_date(&text("fechaFactura")),
        fecha_vencimiento: parse_date(&text("fechaVencimiento")),
        fecha_pago: parse_date(&text("fechaPago")),

        subtotal: amount("subtotal"),
        descuento: amount("descuento"),
        monto_servicios: amount("montoServicios"),
        monto_bienes: amount("montoBienes"),
        itbis: amount("itbis"),
        itbis_tasa: amount("itbisTasa"),
        itbis_retenido: amount("itbisRetenido"),
        itbis_retenido_porcentaje: coerce::integer(field("itbisRetenidoPorcentaje")),
        itbis_exento: amount("itbisExento"),
        itbis_proporcionalidad: amount("itbisProporcionalidad"),
        itbis_costo: amount("itbisCosto"),
        isr: amount("isr"),
        retencion_isr_tipo: coerce::integer(field("retencionIsrTipo")),
        isc: amount("isc"),
        isc_categoria,
        cdt_monto: amount("cdtMonto"),
        cargo_911: amount("cargo911"),
        propina: amount("propina"),
        otros_impuestos: amount("otrosImpuestos"),
        monto_no_facturable: amount("montoNoFacturable"),
        total: amount("total"),

        forma_pago: text("formaPago"),
        tipo_bien_servicio: text("tipoBienServicio"),

        items: items(field("items")),
        raw_text: String::new(),
    };

    tracing::debug!(
        ncf = %invoice.ncf,
        rnc_emisor = %invoice.rnc_emisor,
        total = %invoice.total,
        items = invoice.items.len(),
        "normalized provider response"
    );

    invoice
}

fn tipo_id(explicit: &str, rnc: &str) -> Option<TipoId> {
    TipoId::from_code(explicit).or_else(|| detect_tipo_id(rnc))
}

fn items(value: &Value) -> Vec<InvoiceItem> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let field = |key: &str| item.get(key).unwrap_or(&NULL);
            let first_amount = |keys: &[&str]| {
                keys.iter()
                    .map(|k| coerce::amount(field(*k)))
                    .find(|v| !v.is_zero())
                    .unwrap_or(Decimal::ZERO)
            };

            let cantidad = coerce::amount(field("cantidad"));
            let itbis = coerce::amount(field("itbis"));
            InvoiceItem {
                codigo: coerce::text(field("codigo")),
                descripcion: coerce::text(field("descripcion")),
                cantidad: if cantidad.is_zero() { Decimal::ONE } else { cantidad },
                precio_unit: first_amount(&["precioUnit", "precioUnitario"]),
                descuento: coerce::amount(field("descuento")),
                is_taxed: !itbis.is_zero(),
                itbis,
                importe: first_amount(&["importe", "montoTotal"]),
            }
        })
        .collect()
}
