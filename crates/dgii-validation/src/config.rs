//! Validator configuration.
//!
//! Defaults match DGII practice: 5% relative tolerance on every rate
//! check and automatic approval at 85% extraction confidence. Override via
//! environment variables or explicit construction.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::validator::DEFAULT_TOLERANCE;

/// Environment variable for the relative tolerance.
pub const ENV_TOLERANCE: &str = "DGII_TOLERANCE";
/// Environment variable for the review confidence threshold.
pub const ENV_REVIEW_THRESHOLD: &str = "DGII_REVIEW_THRESHOLD";

/// Default confidence below which a valid invoice is routed to review.
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.85;

/// Tunables for validation and status resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConfig {
    /// Relative tolerance for rate checks, in `0..=1`.
    pub tolerance: Decimal,
    /// Minimum confidence for the `validated` status, in `0..=1`.
    pub review_confidence_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            review_confidence_threshold: DEFAULT_REVIEW_THRESHOLD,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DGII_TOLERANCE` (default: `0.05`)
    /// - `DGII_REVIEW_THRESHOLD` (default: `0.85`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TOLERANCE) {
            config.tolerance = parse_fraction(ENV_TOLERANCE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REVIEW_THRESHOLD) {
            config.review_confidence_threshold = parse_fraction(ENV_REVIEW_THRESHOLD, &raw)?
                .to_f64()
                .ok_or_else(|| ConfigError::Invalid(ENV_REVIEW_THRESHOLD.to_string(), raw))?;
        }

        Ok(config)
    }

    /// Builder: override the tolerance.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Result<Self, ConfigError> {
        self.tolerance = check_range("tolerance", tolerance)?;
        Ok(self)
    }

    /// Builder: override the review threshold.
    pub fn with_review_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange(
                "review threshold".to_string(),
                threshold.to_string(),
            ));
        }
        self.review_confidence_threshold = threshold;
        Ok(self)
    }
}

fn parse_fraction(var: &str, raw: &str) -> Result<Decimal, ConfigError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| ConfigError::Invalid(var.to_string(), raw.to_string()))?;
    check_range(var, value)
}

fn check_range(name: &str, value: Decimal) -> Result<Decimal, ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::OutOfRange(name.to_string(), value.to_string()));
    }
    Ok(value)
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?} is not a decimal number")]
    Invalid(String, String),
    #[error("{0} must be between 0 and 1, got {1}")]
    OutOfRange(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ValidatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.tolerance, dec!(0.05));
        assert_eq!(config.review_confidence_threshold, 0.85);
    }

    #[test]
    fn reads_both_variables() {
        let config = ValidatorConfig::from_lookup(lookup(&[
            (ENV_TOLERANCE, " 0.02 "),
            (ENV_REVIEW_THRESHOLD, "0.9"),
        ]))
        .unwrap();
        assert_eq!(config.tolerance, dec!(0.02));
        assert_eq!(config.review_confidence_threshold, 0.9);
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        let err = ValidatorConfig::from_lookup(lookup(&[(ENV_TOLERANCE, "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref var, _) if var == ENV_TOLERANCE));

        let err = ValidatorConfig::from_lookup(lookup(&[(ENV_REVIEW_THRESHOLD, "1.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(..)));

        let err = ValidatorConfig::from_lookup(lookup(&[(ENV_TOLERANCE, "-0.01")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(..)));
    }

    #[test]
    fn builders_validate_range() {
        let config = ValidatorConfig::default()
            .with_tolerance(dec!(0.1))
            .unwrap()
            .with_review_threshold(0.5)
            .unwrap();
        assert_eq!(config.tolerance, dec!(0.1));
        assert_eq!(config.review_confidence_threshold, 0.5);

        assert!(ValidatorConfig::default().with_tolerance(dec!(2)).is_err());
        assert!(ValidatorConfig::default().with_review_threshold(f64::NAN).is_err());
    }
}
