//! Decimal helpers shared by the aggregator and the scaler
//!
//! Every operation here is checked: overflow or a zero divisor yields `None`
//! and the caller picks the inert fallback.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// 100 as a `Decimal`.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `part / whole × 100`, or `None` when `whole` is zero or the result overflows.
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)?.checked_mul(HUNDRED)
}

/// Position of `value` inside `[min, max]` as a percentage of the range.
pub fn position_percent(value: Decimal, min: Decimal, max: Decimal) -> Option<Decimal> {
    let range = max.checked_sub(min)?;
    if range <= Decimal::ZERO {
        return None;
    }
    percent_of(value.checked_sub(min)?, range)
}

/// Round half away from zero to `dp` places for display.
pub fn round_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
