//! # Lenient Value Coercion
//!
//! AI providers return amounts in whatever shape the model felt like:
//! `1180`, `1180.5`, `"1180.50"`, `"3,965.34"`, `""`, `null`. This module
//! turns any of those into a canonical [`Decimal`], defaulting to zero
//! when the value is absent or cannot be read as a number.
//!
//! A missing amount and a zero amount are the same thing downstream. The
//! validator gates every check on the amounts it needs being positive.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Coerce a JSON value into an amount.
///
/// Accepts numbers, numeric strings and strings with comma thousands
/// separators. Returns zero for null, empty strings, booleans, arrays,
/// objects and anything that fails to parse.
pub fn amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or_else(|| {
            tracing::debug!(value = %n, "numeric amount outside decimal range, using 0");
            Decimal::ZERO
        }),
        Value::String(s) => amount_from_str(s),
        _ => Decimal::ZERO,
    }
}

/// Coerce a string into an amount with the same rules as [`amount`].
pub fn amount_from_str(s: &str) -> Decimal {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    parse_decimal(&cleaned).unwrap_or_else(|| {
        tracing::debug!(value = %s, "unparseable amount string, using 0");
        Decimal::ZERO
    })
}

/// Coerce a JSON value into an integer code, truncating toward zero.
///
/// Used for small enumerations the provider may return as `6`, `"6"` or
/// `6.0`. Out-of-range values become zero.
pub fn integer(value: &Value) -> i32 {
    amount(value).trunc().to_i32().unwrap_or(0)
}

/// Coerce a JSON value into text. Numbers are rendered in their JSON
/// form so an RNC returned as `131047939` survives; null and
/// non-scalars become the empty string.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
