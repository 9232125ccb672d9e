//! # Statutory Tax Parameters
//!
//! Rates and categories for the Dominican taxes that appear on an invoice:
//!
//! - **ITBIS** (Impuesto sobre Transferencias de Bienes Industrializados y
//!   Servicios): 18% standard, 16% for zona franca suppliers.
//! - **ISC** (Impuesto Selectivo al Consumo): charged per category.
//! - **ISR** withholding: retention types 1-8 with fixed rates.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// ITBIS
// ---------------------------------------------------------------------------

/// ITBIS rate regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItbisRate {
    /// 18%.
    Standard,
    /// 16%, zona franca.
    ZonaFranca,
}

impl ItbisRate {
    /// Select the regime from a whole-number percentage as printed on the
    /// invoice. Anything other than exactly 16 is the standard rate, so an
    /// absent (zero) rate defaults to 18%.
    pub fn from_percent(percent: Decimal) -> Self {
        if percent == Decimal::from(16) {
            Self::ZonaFranca
        } else {
            Self::Standard
        }
    }

    /// The rate as a fraction (`0.18` or `0.16`).
    pub fn fraction(&self) -> Decimal {
        Decimal::new(self.percent(), 2)
    }

    /// The rate as a whole-number percentage.
    pub fn percent(&self) -> i64 {
        match self {
            Self::Standard => 18,
            Self::ZonaFranca => 16,
        }
    }
}

// ---------------------------------------------------------------------------
// ISC
// ---------------------------------------------------------------------------

/// ISC category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IscCategory {
    Seguros,
    Telecom,
    Alcohol,
    Tabaco,
    Vehiculos,
    Combustibles,
}

impl IscCategory {
    /// Return the string representation of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seguros => "seguros",
            Self::Telecom => "telecom",
            Self::Alcohol => "alcohol",
            Self::Tabaco => "tabaco",
            Self::Vehiculos => "vehiculos",
            Self::Combustibles => "combustibles",
        }
    }

    /// Return all ISC category variants.
    pub fn all() -> &'static [IscCategory] {
        &[
            Self::Seguros,
            Self::Telecom,
            Self::Alcohol,
            Self::Tabaco,
            Self::Vehiculos,
            Self::Combustibles,
        ]
    }

    /// Exact lookup by lowercase code. Use [`FromStr`] for free-form text.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == code)
    }

    /// Serde helper for optional categories where the empty string means
    /// "no ISC". Codes must match exactly.
    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(code) => Self::from_code(code).map(Some).ok_or_else(|| {
                serde::de::Error::custom(ValidationError::UnknownIscCategory(code.to_string()))
            }),
        }
    }
}

impl FromStr for IscCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| ValidationError::UnknownIscCategory(s.to_string()))
    }
}

impl std::fmt::Display for IscCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ISR withholding
// ---------------------------------------------------------------------------

/// An ISR retention type and its withholding rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IsrRetentionType {
    /// DGII retention type code, 1-8.
    pub tipo: i32,
    /// Name used on the 606 report.
    pub name: &'static str,
    /// Withholding rate as a whole-number percentage.
    pub rate_percent: i64,
}

impl IsrRetentionType {
    /// The withholding rate as a fraction.
    pub fn rate(&self) -> Decimal {
        Decimal::new(self.rate_percent, 2)
    }

    /// Look up a retention type by code.
    pub fn lookup(tipo: i32) -> Option<&'static IsrRetentionType> {
        ISR_RETENTION_TYPES.iter().find(|t| t.tipo == tipo)
    }
}

/// ISR retention rates by type.
///
/// Kept exactly as configured in production; several rates differ from the
/// statutory schedule for the named concept and must not be "corrected"
/// here without confirmation from the tax team.
pub static ISR_RETENTION_TYPES: [IsrRetentionType; 8] = [
    IsrRetentionType { tipo: 1, name: "Alquileres", rate_percent: 10 },
    IsrRetentionType { tipo: 2, name: "Honorarios por servicios independientes", rate_percent: 10 },
    IsrRetentionType { tipo: 3, name: "Comisiones", rate_percent: 10 },
    IsrRetentionType { tipo: 4, name: "Intereses pagados a personas físicas", rate_percent: 10 },
    IsrRetentionType { tipo: 5, name: "Dividendos", rate_percent: 10 },
    IsrRetentionType { tipo: 6, name: "Premios", rate_percent: 25 },
    IsrRetentionType { tipo: 7, name: "Transferencias inmobiliarias", rate_percent: 27 },
    IsrRetentionType { tipo: 8, name: "Otras retenciones", rate_percent: 10 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn itbis_rate_selection() {
        assert_eq!(ItbisRate::from_percent(dec!(16)), ItbisRate::ZonaFranca);
        assert_eq!(ItbisRate::from_percent(dec!(16.0)), ItbisRate::ZonaFranca);
        assert_eq!(ItbisRate::from_percent(dec!(18)), ItbisRate::Standard);
        assert_eq!(ItbisRate::from_percent(Decimal::ZERO), ItbisRate::Standard);
        assert_eq!(ItbisRate::from_percent(dec!(0.16)), ItbisRate::Standard);
        assert_eq!(ItbisRate::ZonaFranca.fraction(), dec!(0.16));
        assert_eq!(ItbisRate::Standard.fraction(), dec!(0.18));
    }

    #[test]
    fn isc_category_parse_is_case_insensitive() {
        assert_eq!("Telecom".parse::<IscCategory>().unwrap(), IscCategory::Telecom);
        assert_eq!(" tabaco ".parse::<IscCategory>().unwrap(), IscCategory::Tabaco);
        assert!("cafe".parse::<IscCategory>().is_err());
        assert_eq!(IscCategory::all().len(), 6);
    }

    #[test]
    fn isc_category_optional_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "IscCategory::deserialize_optional")]
            cat: Option<IscCategory>,
        }
        let p: Holder = serde_json::from_str(r#"{"cat": ""}"#).unwrap();
        assert_eq!(p.cat, None);
        let p: Holder = serde_json::from_str(r#"{"cat": null}"#).unwrap();
        assert_eq!(p.cat, None);
        let p: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.cat, None);
        let p: Holder = serde_json::from_str(r#"{"cat": "telecom"}"#).unwrap();
        assert_eq!(p.cat, Some(IscCategory::Telecom));
        assert!(serde_json::from_str::<Holder>(r#"{"cat": "cafe"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"cat": "Telecom"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"cat": " telecom"}"#).is_err());
    }

    #[test]
    fn isc_category_from_code_is_exact() {
        assert_eq!(IscCategory::from_code("seguros"), Some(IscCategory::Seguros));
        assert_eq!(IscCategory::from_code("SEGUROS"), None);
        assert_eq!(IscCategory::from_code(""), None);
    }

    #[test]
    fn isr_rate_table_as_configured() {
        for tipo in [1, 2, 3, 4, 5, 8] {
            assert_eq!(IsrRetentionType::lookup(tipo).unwrap().rate(), dec!(0.10));
        }
        assert_eq!(IsrRetentionType::lookup(6).unwrap().rate(), dec!(0.25));
        assert_eq!(IsrRetentionType::lookup(7).unwrap().rate(), dec!(0.27));
        assert!(IsrRetentionType::lookup(0).is_none());
        assert!(IsrRetentionType::lookup(9).is_none());
    }
}
