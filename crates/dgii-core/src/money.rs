//! Currency rounding helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a value to zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
