//! # Taxpayer Identifiers
//!
//! DGII identifies issuers and receivers either by RNC (Registro Nacional
//! del Contribuyente, 9 digits, companies) or by cédula (11 digits,
//! individuals). Both share the same field on an invoice, so the length
//! of the digit string decides which one it is.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of taxpayer identifier, using the DGII codes from the 606/607
/// reports (`"1"` = RNC, `"2"` = cédula).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipoId {
    /// 9-digit company RNC.
    #[serde(rename = "1")]
    Rnc,
    /// 11-digit personal cédula.
    #[serde(rename = "2")]
    Cedula,
}

impl TipoId {
    /// Return the DGII code for this identifier kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rnc => "1",
            Self::Cedula => "2",
        }
    }

    /// Parse a DGII code (`"1"` or `"2"`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Rnc),
            "2" => Some(Self::Cedula),
            _ => None,
        }
    }

    /// Classify a digit string by length.
    pub fn from_digit_count(len: usize) -> Option<Self> {
        match len {
            9 => Some(Self::Rnc),
            11 => Some(Self::Cedula),
            _ => None,
        }
    }
}

impl std::fmt::Display for TipoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated RNC or cédula, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rnc(String);

impl Rnc {
    /// Create an identifier, validating format.
    ///
    /// Accepts `"131047939"`, `"1-31-04793-9"`, `"00112345678"` and
    /// `"001-1234567-8"`. Dashes and spaces are stripped; any other
    /// non-digit is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRnc`] if the digit count is
    /// neither 9 nor 11.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if raw
            .chars()
            .any(|c| !(c.is_ascii_digit() || c == '-' || c == ' '))
        {
            return Err(ValidationError::InvalidRnc(raw));
        }
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if TipoId::from_digit_count(digits.len()).is_none() {
            return Err(ValidationError::InvalidRnc(raw));
        }
        Ok(Self(digits))
    }

    /// Access the canonical digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a company RNC or a personal cédula.
    pub fn tipo_id(&self) -> TipoId {
        match TipoId::from_digit_count(self.0.len()) {
            Some(t) => t,
            // Length is checked in `new`.
            None => TipoId::Rnc,
        }
    }
}

impl TryFrom<String> for Rnc {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rnc> for String {
    fn from(rnc: Rnc) -> Self {
        rnc.0
    }
}

impl std::fmt::Display for Rnc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
