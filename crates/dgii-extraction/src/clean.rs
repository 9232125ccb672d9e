//! Identifier cleanup for OCR/AI output.
//!
//! Extracted identifiers come back with dashes, spaces, lowercase letters
//! and stray punctuation (`"b01-0000 0001"`, `"1-31-04793-9"`). These
//! helpers reduce them to the canonical character set before any format
//! check runs.

use dgii_core::{Rnc, TipoId};

/// Keep ASCII digits only.
pub fn clean_rnc(rnc: &str) -> String {
    rnc.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep ASCII alphanumerics, uppercased.
pub fn clean_ncf(ncf: &str) -> String {
    ncf.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Classify an identifier as RNC (9 digits) or cédula (11 digits) after
/// cleaning. Any other length yields `None`.
pub fn detect_tipo_id(id: &str) -> Option<TipoId> {
    Rnc::new(clean_rnc(id)).ok().map(|rnc| rnc.tipo_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_rnc_keeps_digits() {
        assert_eq!(clean_rnc("1-31-04793-9"), "131047939");
        assert_eq!(clean_rnc("RNC: 131 047 939"), "131047939");
        assert_eq!(clean_rnc(""), "");
    }

    #[test]
    fn clean_ncf_uppercases_alphanumerics() {
        assert_eq!(clean_ncf("b01-0000 0001"), "B0100000001");
        assert_eq!(clean_ncf(" E31.0000000001 "), "E310000000001");
        assert_eq!(clean_ncf("ñB01"), "B01");
    }

    #[test]
    fn detect_tipo_id_by_length() {
        assert_eq!(detect_tipo_id("131047939"), Some(TipoId::Rnc));
        assert_eq!(detect_tipo_id("001-1234567-8"), Some(TipoId::Cedula));
        assert_eq!(detect_tipo_id("12345"), None);
        assert_eq!(detect_tipo_id(""), None);
    }
}
