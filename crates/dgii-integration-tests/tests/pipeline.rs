//! # End-to-end pipeline
//!
//! Provider response in, filing status out: normalization, validation,
//! scoring and status resolution across all library crates, plus the CLI
//! on files.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use dgii_cli::process::{run_process, ProcessArgs};
use dgii_cli::Settings;
use dgii_extraction::parse_provider_response;
use dgii_validation::{
    assess_at, ConfidenceScorer, ExtractionStatus, FindingCode, InvoiceAssessor, TaxValidator,
    ValidatorConfig,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn assess(response: &str) -> dgii_validation::Assessment {
    let invoice = parse_provider_response(response).unwrap();
    InvoiceAssessor::default().assess_at(&invoice, now())
}

/// Supermarket receipt, fully populated, the way a model returns it.
const SUPERMARKET: &str = r#"```json
{
  "ncf": "B01 0000 0123",
  "tipoNcf": "B01",
  "rncEmisor": "1-01-00164-5",
  "nombreEmisor": "Supermercados Nacional SRL",
  "rncReceptor": "131-04793-9",
  "nombreReceptor": "Constructora Batey SRL",
  "fechaFactura": "14/03/2025",
  "fechaVencimiento": "2099-12-31",
  "subtotal": "3,360.47",
  "montoBienes": "3,360.47",
  "itbis": "604.88",
  "itbisTasa": 18,
  "total": "3,965.35",
  "formaPago": "03",
  "tipoBienServicio": "09",
  "items": [
    {"codigo": "001", "descripcion": "Cemento gris", "cantidad": 5, "precioUnit": "672.094", "itbis": "604.88", "importe": "3,965.35"}
  ]
}
```"#;

#[test]
fn fully_populated_invoice_is_validated_with_full_confidence() {
    let invoice = parse_provider_response(SUPERMARKET).unwrap();
    assert_eq!(ConfidenceScorer::new().score(&invoice), 1.0);

    let assessment = InvoiceAssessor::default().assess_at(&invoice, now());
    assert_eq!(assessment.status, ExtractionStatus::Validated);
    assert!(assessment.validation.is_valid());
    assert!(!assessment.validation.needs_review());
    assert_eq!(assessment.validation.computed().base_gravada, dec!(3360.47));
    assert_eq!(assessment.validation.computed().itbis_esperado, dec!(604.88));
    assert_eq!(assessment.validation.computed().total_esperado, dec!(3965.35));
}

#[test]
fn restaurant_with_legal_tip() {
    let assessment = assess(
        r#"{
            "ncf": "B0200004512", "rncEmisor": "130123456", "nombreEmisor": "Adrian Tropical",
            "fechaFactura": "2025-05-02", "subtotal": 1000, "itbis": 180, "propina": 100,
            "total": 1280
        }"#,
    );
    // No total-consistency bonus: the tip is not part of subtotal + ITBIS.
    assert_eq!(assessment.confidence, 0.9);
    assert_eq!(assessment.status, ExtractionStatus::Validated);
}

#[test]
fn restaurant_with_wrong_tip_goes_to_review() {
    let assessment = assess(
        r#"{
            "ncf": "B0200004512", "rncEmisor": "130123456", "nombreEmisor": "Adrian Tropical",
            "fechaFactura": "2025-05-02", "subtotal": 1000, "itbis": 180, "propina": 150,
            "total": 1330
        }"#,
    );
    assert_eq!(assessment.status, ExtractionStatus::Review);
    assert!(assessment.validation.is_valid());
    assert!(assessment.validation.has_code(FindingCode::PropinaMismatch));
    assert!(assessment.review_notes().unwrap().unwrap().contains("propina_mismatch"));
}

#[test]
fn telecom_bill_with_statutory_surcharges() {
    let assessment = assess(
        r#"{
            "ncf": "E310000004521", "rncEmisor": "101001577", "nombreEmisor": "Compania Dominicana de Telefonos",
            "fechaFactura": "2025-05-31", "subtotal": 1000, "montoServicios": 1000,
            "itbis": 180, "isc": 100, "iscCategoria": "telecom", "cdtMonto": 20, "cargo911": 10,
            "total": 1310
        }"#,
    );
    assert_eq!(assessment.status, ExtractionStatus::Validated);
    assert!(!assessment.validation.has_findings());
}

#[test]
fn telecom_bill_with_wrong_surcharges_stays_valid() {
    let assessment = assess(
        r#"{
            "ncf": "E310000004521", "rncEmisor": "101001577", "nombreEmisor": "Compania Dominicana de Telefonos",
            "fechaFactura": "2025-05-31", "montoServicios": 1000,
            "itbis": 180, "isc": 50, "iscCategoria": "TELECOM", "cdtMonto": 15,
            "total": 1245
        }"#,
    );
    assert!(assessment.validation.is_valid());
    assert!(assessment.validation.needs_review());
    assert!(assessment.validation.has_code(FindingCode::IscTelecomMismatch));
    assert!(assessment.validation.has_code(FindingCode::CdtMismatch));
    assert_eq!(assessment.status, ExtractionStatus::Review);
}

#[test]
fn professional_fees_with_isr_retention() {
    let without_payment_date = r#"{
        "ncf": "B0100000077", "rncEmisor": "00112345678", "nombreEmisor": "Lic. Perez",
        "fechaFactura": "2025-01-20", "montoServicios": 10000, "subtotal": 10000,
        "itbis": 1800, "itbisRetenido": 540, "isr": 1000, "retencionIsrTipo": 2,
        "total": 11800
    }"#;
    let assessment = assess(without_payment_date);
    assert_eq!(assessment.status, ExtractionStatus::Error);
    assert!(assessment.validation.has_code(FindingCode::MissingPaymentDate));

    let with_payment_date =
        without_payment_date.replace("\"total\": 11800", "\"total\": 11800, \"fechaPago\": \"10/02/2025\"");
    let assessment = assess(&with_payment_date);
    assert_eq!(assessment.status, ExtractionStatus::Validated);
}

#[test]
fn expired_ncf_is_an_error() {
    let invoice = parse_provider_response(
        r#"{"ncf": "B0100000001", "fechaVencimiento": "2024-12-31", "subtotal": 100, "itbis": 18, "total": 118}"#,
    )
    .unwrap();
    let assessment = assess_at(
        &invoice,
        &TaxValidator::new(),
        &ConfidenceScorer::new(),
        0.85,
        now(),
    );
    assert_eq!(assessment.status, ExtractionStatus::Error);
    assert_eq!(assessment.validation.errors()[0].code, FindingCode::NcfExpired);
}

#[test]
fn zona_franca_rate() {
    let assessment = assess(
        r#"{"ncf": "B0100000009", "montoBienes": 5000, "itbis": 800, "itbisTasa": "16", "total": 5800}"#,
    );
    assert!(assessment.validation.is_valid());
    assert_eq!(assessment.validation.computed().itbis_esperado, dec!(800));
}

#[test]
fn stricter_configuration_changes_outcome() {
    let response = r#"{"montoServicios": 1000, "itbis": 200, "total": 1200}"#;
    let invoice = parse_provider_response(response).unwrap();

    assert!(InvoiceAssessor::default()
        .assess_at(&invoice, now())
        .validation
        .is_valid());

    let strict = ValidatorConfig::default().with_tolerance(dec!(0.01)).unwrap();
    let assessment = InvoiceAssessor::new(&strict).assess_at(&invoice, now());
    assert_eq!(assessment.status, ExtractionStatus::Error);
    assert!(assessment.validation.has_code(FindingCode::ItbisMismatch));
}

#[test]
fn empty_provider_object_is_an_error_not_a_crash() {
    let assessment = assess("{}");
    assert_eq!(assessment.status, ExtractionStatus::Error);
    assert_eq!(assessment.validation.errors().len(), 1);
    assert_eq!(assessment.validation.errors()[0].code, FindingCode::NoAmounts);
}

#[test]
fn cli_process_reads_provider_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("response.json");
    std::fs::write(&path, SUPERMARKET).unwrap();

    let mut out = Vec::new();
    let args = ProcessArgs {
        path,
        with_invoice: true,
    };
    let code = run_process(&args, &Settings::default(), &mut out).unwrap();
    assert_eq!(code, 0);

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "validated");
    assert_eq!(value["invoice"]["ncf"], "B0100000123");
    assert_eq!(value["invoice"]["rncEmisor"], "101001645");
    assert_eq!(value["invoice"]["tipoIdReceptor"], "1");
}

#[test]
fn cli_process_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = ProcessArgs {
        path: dir.path().join("nope.json"),
        with_invoice: false,
    };
    let mut out = Vec::new();
    assert!(run_process(&args, &Settings::default(), &mut out).is_err());
}
