//! # NCF: Número de Comprobante Fiscal
//!
//! The fiscal receipt number printed on every DGII invoice. A well-formed
//! NCF is one series letter (`B` for paper receipts, `E` for electronic
//! e-CF) followed by 10 to 12 digits. The first three characters encode the
//! receipt type (`B01` = crédito fiscal, `E31` = factura electrónica, ...).
//!
//! The type table below is closed: a well-formed NCF whose prefix is not
//! listed is still a valid NCF, it is just a type we do not recognise.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// NCF format: series letter followed by 10-12 digits.
static NCF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[BE][0-9]{10,12}$").expect("NCF pattern is a valid regex"));

/// A known receipt type code and its DGII description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NcfType {
    /// Three-character prefix, e.g. `"B01"`.
    pub code: &'static str,
    /// Human-readable DGII name.
    pub description: &'static str,
}

/// Receipt types recognised by the validator.
pub static NCF_TYPES: [NcfType; 14] = [
    NcfType { code: "B01", description: "Factura Crédito Fiscal" },
    NcfType { code: "B02", description: "Factura Consumidor Final" },
    NcfType { code: "B04", description: "Nota de Crédito" },
    NcfType { code: "B14", description: "Régimen Especial" },
    NcfType { code: "B15", description: "Gubernamental" },
    NcfType { code: "B16", description: "Exportación" },
    NcfType { code: "E31", description: "Factura Electrónica" },
    NcfType { code: "E32", description: "Nota Débito Electrónica" },
    NcfType { code: "E33", description: "Nota Crédito Electrónica" },
    NcfType { code: "E34", description: "Compras Electrónicas" },
    NcfType { code: "E41", description: "Comprobante Compras" },
    NcfType { code: "E43", description: "Gastos Menores" },
    NcfType { code: "E44", description: "Regímenes Especiales" },
    NcfType { code: "E45", description: "Gubernamental" },
];

impl NcfType {
    /// Look up a type by its three-character code.
    pub fn lookup(code: &str) -> Option<&'static NcfType> {
        NCF_TYPES.iter().find(|t| t.code == code)
    }
}

/// A well-formed NCF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ncf(String);

impl Ncf {
    /// Create an NCF, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNcf`] if the value does not match
    /// `^[BE][0-9]{10,12}$`. No cleaning is applied: callers holding raw
    /// OCR text should normalize it first.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::is_well_formed(&s) {
            return Err(ValidationError::InvalidNcf(s));
        }
        Ok(Self(s))
    }

    /// Check the format without allocating.
    pub fn is_well_formed(s: &str) -> bool {
        NCF_PATTERN.is_match(s)
    }

    /// Access the NCF string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three-character type prefix (series letter plus two digits).
    pub fn type_code(&self) -> &str {
        // Format guarantees at least 11 ASCII characters.
        &self.0[..3]
    }

    /// The recognised receipt type, if any.
    pub fn ncf_type(&self) -> Option<&'static NcfType> {
        NcfType::lookup(self.type_code())
    }

    /// Whether this is an electronic (e-CF) receipt.
    pub fn is_electronic(&self) -> bool {
        self.0.starts_with('E')
    }
}

impl TryFrom<String> for Ncf {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ncf> for String {
    fn from(ncf: Ncf) -> Self {
        ncf.0
    }
}

impl std::fmt::Display for Ncf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
