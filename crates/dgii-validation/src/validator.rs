//! # Tax Validator
//!
//! Cross-checks the tax fields of one invoice against DGII statutory
//! rates. Seven independent checks run in a fixed order; the order only
//! affects the order of findings in the result, never the outcome.
//!
//! 1. ITBIS vs. base gravada
//! 2. Total vs. sum of components
//! 3. Propina legal (10%)
//! 4. Telecom ISC (10%) and CDT (2%)
//! 5. NCF format, type and expiry
//! 6. Retention coherence (payment date, ISR type and rate)
//! 7. Field coherence (amounts present, exento, discount)
//!
//! ## Zero-data guard
//!
//! Every check is gated on the data it needs being present (positive base,
//! positive total, non-empty NCF, ...). A zero-filled record produces no
//! findings from a gated check: missing data is never reported as an
//! inconsistency.
//!
//! ## Determinism
//!
//! The validator holds only its tolerance. [`TaxValidator::validate_at`]
//! takes the reference instant for NCF expiry, so identical inputs and
//! instants always produce identical results.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dgii_core::money::{non_negative, round2};
use dgii_core::{InvoiceTaxInput, IscCategory, IsrRetentionType, ItbisRate, Ncf};

use crate::config::ValidatorConfig;
use crate::result::{
    ComputedValues, FindingCode, ValidationIssue, ValidationResult, ValidationWarning,
};

/// Default relative tolerance (5%).
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.05);

/// Statutory propina legal rate.
const PROPINA_RATE: Decimal = dec!(0.10);
/// Propina has its own, wider tolerance: 10% of the expected tip.
const PROPINA_TOLERANCE: Decimal = dec!(0.10);
/// ISC rate on telecom services.
const ISC_TELECOM_RATE: Decimal = dec!(0.10);
/// Contribución al Desarrollo de las Telecomunicaciones.
const CDT_RATE: Decimal = dec!(0.02);

/// Unrounded reference values shared by the checks.
///
/// Only `base_gravada` is clamped here. A discount larger than the subtotal
/// makes `monto_facturado` and `total_esperado` negative, and the checks
/// compare against those raw values.
#[derive(Debug, Clone, Copy)]
struct Reference {
    base_gravada: Decimal,
    monto_facturado: Decimal,
    itbis_rate: ItbisRate,
    itbis_esperado: Decimal,
    total_esperado: Decimal,
}

impl Reference {
    fn compute(input: &InvoiceTaxInput) -> Self {
        let base_gravada = non_negative(input.net_amount() - input.itbis_exento);
        let monto_facturado = input.net_amount();
        let itbis_rate = ItbisRate::from_percent(input.itbis_tasa);
        let itbis_esperado = base_gravada * itbis_rate.fraction();
        let total_esperado = monto_facturado
            + input.itbis_facturado
            + input.isc_monto
            + input.cdt_monto
            + input.cargo_911
            + input.propina_legal
            + input.otros_impuestos;

        Self {
            base_gravada,
            monto_facturado,
            itbis_rate,
            itbis_esperado,
            total_esperado,
        }
    }

    fn rounded(&self) -> ComputedValues {
        ComputedValues {
            base_gravada: round2(self.base_gravada),
            itbis_esperado: round2(self.itbis_esperado),
            total_esperado: round2(non_negative(self.total_esperado)),
            monto_facturado: round2(non_negative(self.monto_facturado)),
        }
    }
}

/// Findings accumulated while the checks run.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationWarning>,
}

impl Findings {
    fn error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    fn warn(&mut self, field: &str, code: FindingCode, message: impl Into<String>) {
        self.warnings.push(ValidationWarning::new(field, code, message));
    }
}

/// `|actual - expected| > tolerance`.
fn exceeds(actual: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
    (actual - expected).abs() > tolerance
}

/// Validates DGII invoice tax fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxValidator {
    /// Relative tolerance, e.g. `0.05` for 5%.
    tolerance: Decimal,
}

impl TaxValidator {
    /// Create a validator with the default 5% tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create a validator with a custom relative tolerance.
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Create a validator from loaded configuration.
    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::with_tolerance(config.tolerance)
    }

    /// The configured relative tolerance.
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Validate against the current time.
    pub fn validate(&self, input: &InvoiceTaxInput) -> ValidationResult {
        self.validate_at(input, Utc::now())
    }

    /// Validate with an explicit reference instant for NCF expiry.
    pub fn validate_at(&self, input: &InvoiceTaxInput, now: DateTime<Utc>) -> ValidationResult {
        let reference = Reference::compute(input);
        let mut findings = Findings::default();

        self.check_itbis(input, &reference, &mut findings);
        self.check_total(input, &reference, &mut findings);
        self.check_propina(input, &reference, &mut findings);
        self.check_telecom(input, &reference, &mut findings);
        self.check_ncf(input, now, &mut findings);
        self.check_retentions(input, &mut findings);
        self.check_coherence(input, &mut findings);

        let result = ValidationResult::new(findings.errors, findings.warnings, reference.rounded());

        tracing::debug!(
            ncf = %input.ncf,
            valid = result.is_valid(),
            errors = result.errors().len(),
            warnings = result.warnings().len(),
            "tax validation complete"
        );

        result
    }

    // -- 1. ITBIS ----------------------------------------------------------

    fn check_itbis(&self, input: &InvoiceTaxInput, r: &Reference, out: &mut Findings) {
        if r.base_gravada <= Decimal::ZERO {
            return;
        }

        if exceeds(
            input.itbis_facturado,
            r.itbis_esperado,
            r.base_gravada * self.tolerance,
        ) {
            out.error(
                ValidationIssue::new(
                    "itbis_facturado",
                    FindingCode::ItbisMismatch,
                    format!(
                        "ITBIS no coincide con {}% de la base gravada",
                        r.itbis_rate.percent()
                    ),
                )
                .with_values(round2(r.itbis_esperado), round2(input.itbis_facturado)),
            );
        }
    }

    // -- 2. Total ----------------------------------------------------------

    fn check_total(&self, input: &InvoiceTaxInput, r: &Reference, out: &mut Findings) {
        if input.total_factura <= Decimal::ZERO {
            return;
        }

        if exceeds(
            input.total_factura,
            r.total_esperado,
            input.total_factura * self.tolerance,
        ) {
            out.error(
                ValidationIssue::new(
                    "total_factura",
                    FindingCode::TotalMismatch,
                    "Total no coincide con la suma de sus componentes",
                )
                .with_values(round2(r.total_esperado), round2(input.total_factura)),
            );
        }
    }

    // -- 3. Propina legal --------------------------------------------------

    fn check_propina(&self, input: &InvoiceTaxInput, r: &Reference, out: &mut Findings) {
        if input.propina_legal <= Decimal::ZERO || r.monto_facturado <= Decimal::ZERO {
            return;
        }

        let esperada = r.monto_facturado * PROPINA_RATE;
        if exceeds(input.propina_legal, esperada, esperada * PROPINA_TOLERANCE) {
            out.warn(
                "propina_legal",
                FindingCode::PropinaMismatch,
                "Propina no coincide con el 10% del monto facturado",
            );
        }
    }

    // -- 4. Telecom --------------------------------------------------------

    fn check_telecom(&self, input: &InvoiceTaxInput, r: &Reference, out: &mut Findings) {
        if input.isc_categoria != Some(IscCategory::Telecom) || r.base_gravada <= Decimal::ZERO {
            return;
        }

        let isc_esperado = r.base_gravada * ISC_TELECOM_RATE;
        if exceeds(input.isc_monto, isc_esperado, isc_esperado * self.tolerance) {
            out.warn(
                "isc_monto",
                FindingCode::IscTelecomMismatch,
                "ISC de telecomunicaciones debe ser 10% de la base gravada",
            );
        }

        let cdt_esperado = r.base_gravada * CDT_RATE;
        if exceeds(input.cdt_monto, cdt_esperado, cdt_esperado * self.tolerance) {
            out.warn(
                "cdt_monto",
                FindingCode::CdtMismatch,
                "CDT debe ser 2% de la base gravada",
            );
        }
    }

    // -- 5. NCF ------------------------------------------------------------

    fn check_ncf(&self, input: &InvoiceTaxInput, now: DateTime<Utc>, out: &mut Findings) {
        if input.ncf.is_empty() {
            return;
        }

        let ncf = match Ncf::new(input.ncf.as_str()) {
            Ok(ncf) => ncf,
            Err(_) => {
                out.error(ValidationIssue::new(
                    "ncf",
                    FindingCode::NcfInvalidFormat,
                    "NCF debe iniciar con B o E seguido de 10 a 12 dígitos",
                ));
                return;
            }
        };

        if ncf.ncf_type().is_none() {
            out.warn(
                "ncf",
                FindingCode::NcfUnknownType,
                format!("Tipo de NCF no reconocido: {}", ncf.type_code()),
            );
        }

        if let Some(vencimiento) = input.ncf_vencimiento() {
            match NaiveDate::parse_from_str(vencimiento, "%Y-%m-%d") {
                Ok(date) if expired(date, now) => {
                    out.error(ValidationIssue::new(
                        "ncf_vencimiento",
                        FindingCode::NcfExpired,
                        format!("NCF vencido desde {date}"),
                    ));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(value = %vencimiento, error = %e, "ignoring unparseable NCF expiry date");
                }
            }
        }
    }

    // -- 6. Retenciones ----------------------------------------------------

    fn check_retentions(&self, input: &InvoiceTaxInput, out: &mut Findings) {
        if input.has_retention() && input.fecha_pago().is_none() {
            out.error(ValidationIssue::new(
                "fecha_pago",
                FindingCode::MissingPaymentDate,
                "Fecha de pago requerida cuando hay retenciones",
            ));
        }

        if input.retencion_isr_monto <= Decimal::ZERO {
            return;
        }

        match IsrRetentionType::lookup(input.retencion_isr_tipo) {
            Some(tipo) => self.check_isr_rate(input, tipo, out),
            None => out.error(ValidationIssue::new(
                "retencion_isr_tipo",
                FindingCode::MissingRetencionTipo,
                "Tipo de retención ISR requerido (1-8)",
            )),
        }
    }

    fn check_isr_rate(&self, input: &InvoiceTaxInput, tipo: &IsrRetentionType, out: &mut Findings) {
        let base = input.net_amount();
        if base <= Decimal::ZERO {
            return;
        }

        let esperado = base * tipo.rate();
        if exceeds(input.retencion_isr_monto, esperado, esperado * self.tolerance) {
            out.warn(
                "retencion_isr_monto",
                FindingCode::IsrRateMismatch,
                format!(
                    "Retención ISR no coincide con la tasa de {}% esperada para el tipo {} ({})",
                    tipo.rate_percent, tipo.tipo, tipo.name
                ),
            );
        }
    }

    // -- 7. Coherencia -----------------------------------------------------

    fn check_coherence(&self, input: &InvoiceTaxInput, out: &mut Findings) {
        if input.monto_servicios.is_zero() && input.monto_bienes.is_zero() {
            out.error(ValidationIssue::new(
                "monto_servicios",
                FindingCode::NoAmounts,
                "Debe existir monto de servicios o de bienes",
            ));
        }

        if input.itbis_exento > Decimal::ZERO && input.net_amount() - input.itbis_exento < Decimal::ZERO {
            out.warn(
                "itbis_exento",
                FindingCode::ItbisExentoExceedsBase,
                "Monto exento de ITBIS excede la base imponible",
            );
        }

        if input.descuento > input.subtotal() {
            out.warn(
                "descuento",
                FindingCode::DescuentoExceedsSubtotal,
                "Descuento excede el subtotal",
            );
        }
    }
}

impl Default for TaxValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// An NCF expires at the start (00:00 UTC) of its expiry date.
fn expired(vencimiento: NaiveDate, now: DateTime<Utc>) -> bool {
    match vencimiento.and_hms_opt(0, 0, 0) {
        Some(midnight) => Utc.from_utc_datetime(&midnight) < now,
        None => false,
    }
}
